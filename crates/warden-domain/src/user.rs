//! User domain types.

use serde::{Deserialize, Serialize};

/// External identity provider a user may be linked to.
///
/// Wire format: lowercase string (`"google"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialProvider {
    Google,
}

impl SocialProvider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }

    /// Parse the stored column value. Returns `None` for unknown providers.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

/// Canonical form of an email address: trimmed and lower-cased.
///
/// Applied before every store and lookup so that uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
