pub mod auth;
pub mod authorize;
pub mod permission;
pub mod role;
pub mod user;
