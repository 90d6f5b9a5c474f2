pub mod outbox_events;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod users;
