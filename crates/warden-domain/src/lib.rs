//! Domain types shared across Warden crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod pagination;
pub mod permission;
pub mod user;
