//! Token fixtures for integration tests.
//!
//! Every kind gets its own secret so cross-kind replay is caught by the signature
//! check as well as the kind claim.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;
use warden_auth_types::token::{
    KindSettings, TokenIdentity, TokenKind, TokenService, TokenSettings,
};

pub fn test_token_settings() -> TokenSettings {
    TokenSettings {
        access: KindSettings::new("test-access-secret", 900),
        refresh: KindSettings::new("test-refresh-secret", 604_800),
        register: KindSettings::new("test-register-secret", 86_400),
        forget_password: KindSettings::new("test-forget-password-secret", 3_600),
    }
}

pub fn test_token_service() -> TokenService {
    TokenService::new(test_token_settings())
}

pub fn identity(id: Uuid, username: &str, email: &str) -> TokenIdentity {
    TokenIdentity {
        id,
        username: username.to_string(),
        email: email.to_string(),
    }
}

/// Identity a test user would carry in its tokens.
pub struct MockAuth {
    pub identity: TokenIdentity,
}

impl MockAuth {
    pub fn new(id: Uuid, username: &str, email: &str) -> Self {
        Self {
            identity: identity(id, username, email),
        }
    }

    pub fn token(&self, tokens: &TokenService, kind: TokenKind) -> String {
        tokens
            .issue(kind, &self.identity, warden_auth_types::token::now_secs())
            .unwrap()
    }

    /// `Authorization: Bearer <access token>`.
    pub fn headers(&self, tokens: &TokenService) -> HeaderMap {
        bearer_headers(&self.token(tokens, TokenKind::Access))
    }
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    map
}
