//! Token issuing/verification and the bearer-header extractor shared by Warden crates.

pub mod bearer;
pub mod token;
