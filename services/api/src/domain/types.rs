use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_auth_types::token::TokenIdentity;
use warden_domain::user::SocialProvider;

/// Credential-store record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string. `None` for accounts created through social login.
    pub password: Option<String>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub social_id: Option<String>,
    pub social_type: Option<SocialProvider>,
    /// Live role, resolved on every lookup. `None` if unassigned or soft-deleted.
    pub role: Option<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn identity(&self) -> TokenIdentity {
        TokenIdentity {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|r| r.name.as_str())
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persisted permission row (the registry itself lives in memory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile returned by an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    pub id: String,
    pub email: String,
    pub username: String,
}

/// Outbox event for async delivery (verification and password-reset mail).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub kind: String,
    pub payload: serde_json::Value,
    pub idempotency_key: String,
}

pub const REGISTER_MAIL_EVENT: &str = "register_mail";
pub const FORGET_PASSWORD_MAIL_EVENT: &str = "forget_password_mail";

/// Maximum username length in characters.
pub const USERNAME_MAX_LEN: usize = 50;

/// Maximum role name length in characters.
pub const ROLE_NAME_MAX_LEN: usize = 50;
