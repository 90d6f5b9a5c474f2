pub mod auth;
pub mod extract;
pub mod guard;
pub mod permission;
pub mod role;
pub mod user;
