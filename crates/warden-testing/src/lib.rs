//! Test utilities for Warden services.
//!
//! Provides a token service fixture, bearer header builders and response helpers.
//! Import in tests only, never in production code.

pub mod auth;
pub mod response;
