#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use warden_domain::pagination::{Page, PageRequest};
use warden_domain::user::SocialProvider;

use crate::domain::types::{PermissionRecord, Role, SocialProfile, User};
use crate::error::ApiError;

/// Credential store. Every lookup excludes soft-deleted users; emails are
/// expected already normalized.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;
    async fn find_by_social_id(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, ApiError>;
    async fn create(&self, user: &User) -> Result<(), ApiError>;
    /// Returns `false` if no live user matched.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError>;
    async fn mark_email_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError>;

    /// Returns `false` if no live user matched.
    async fn update_profile(&self, id: Uuid, username: &str) -> Result<bool, ApiError>;

    /// Returns `false` if the user is unknown or already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn list(&self, page: PageRequest) -> Result<Page<User>, ApiError>;
}

pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, ApiError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, ApiError>;
    async fn create(&self, role: &Role) -> Result<(), ApiError>;

    /// Returns `false` if no live role matched.
    async fn update_name(&self, id: Uuid, name: &str) -> Result<bool, ApiError>;

    /// Returns `false` if the role is unknown or already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError>;

    async fn list(&self, page: PageRequest) -> Result<Page<Role>, ApiError>;

    /// Insert the role → permission link if absent. Returns `true` if inserted.
    async fn link_permission(&self, role_id: Uuid, permission_id: Uuid) -> Result<bool, ApiError>;
}

pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PermissionRecord>, ApiError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<PermissionRecord>, ApiError>;
    async fn create(&self, permission: &PermissionRecord) -> Result<(), ApiError>;
    async fn list(&self, page: PageRequest) -> Result<Page<PermissionRecord>, ApiError>;
}

/// Outgoing mail. Callers treat failures as non-fatal.
pub trait MailSender: Send + Sync {
    async fn send_register_mail(&self, user: &User, token: &str) -> Result<(), ApiError>;
    async fn send_forget_password_mail(&self, user: &User, token: &str) -> Result<(), ApiError>;
}

/// Port for resolving an external access token into a profile.
pub trait SocialProfilePort: Send + Sync {
    async fn fetch_profile(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> Result<SocialProfile, ApiError>;
}
