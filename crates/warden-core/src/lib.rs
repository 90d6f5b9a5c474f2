//! Ambient plumbing shared by Warden services: tracing, request ids, health probes,
//! request validation and password hashing.

pub mod health;
pub mod middleware;
pub mod password;
pub mod serde;
pub mod tracing;
pub mod validation;
