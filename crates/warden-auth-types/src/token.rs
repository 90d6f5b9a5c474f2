//! JWT issuing and verification, one signing secret and lifetime per token kind.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flow a token was minted for. Tokens are not interchangeable across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
    Register,
    ForgetPassword,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
            Self::Register => "register",
            Self::ForgetPassword => "forget_password",
        }
    }
}

/// Minimal identity embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// Access/refresh pair returned by login-like flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Errors returned by [`TokenService::verify`].
///
/// Callers at the HTTP boundary collapse all of these into a single 401.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token minted for a different flow")]
    WrongKind,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// JWT claims payload.
///
/// | Field | Meaning |
/// |-------|---------|
/// | `sub` | user id (UUID string) |
/// | `username`, `email` | identity at issuance time |
/// | `kind` | [`TokenKind`] the token was minted for |
/// | `iat`, `exp` | seconds since UNIX epoch |
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub kind: TokenKind,
    pub iat: u64,
    pub exp: u64,
}

/// Secret and lifetime for one token kind.
#[derive(Debug, Clone)]
pub struct KindSettings {
    pub secret: String,
    pub ttl_secs: u64,
}

impl KindSettings {
    pub fn new(secret: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub access: KindSettings,
    pub refresh: KindSettings,
    pub register: KindSettings,
    pub forget_password: KindSettings,
}

impl TokenSettings {
    fn for_kind(&self, kind: TokenKind) -> &KindSettings {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::Register => &self.register,
            TokenKind::ForgetPassword => &self.forget_password,
        }
    }
}

/// Stateless token issuer/verifier. Pure computation, safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenService {
    settings: TokenSettings,
}

impl TokenService {
    pub fn new(settings: TokenSettings) -> Self {
        Self { settings }
    }

    pub fn ttl(&self, kind: TokenKind) -> u64 {
        self.settings.for_kind(kind).ttl_secs
    }

    // ── Issue ────────────────────────────────────────────────────────────

    /// Sign a token of `kind` for `identity`, issued at `now` (seconds since epoch).
    pub fn issue(
        &self,
        kind: TokenKind,
        identity: &TokenIdentity,
        now: u64,
    ) -> Result<String, TokenError> {
        let settings = self.settings.for_kind(kind);
        let claims = JwtClaims {
            sub: identity.id.to_string(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            kind,
            iat: now,
            exp: now.saturating_add(settings.ttl_secs),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(settings.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn issue_login_token(&self, identity: &TokenIdentity) -> Result<AuthTokens, TokenError> {
        self.issue_login_token_at(identity, now_secs())
    }

    pub fn issue_login_token_at(
        &self,
        identity: &TokenIdentity,
        now: u64,
    ) -> Result<AuthTokens, TokenError> {
        Ok(AuthTokens {
            access_token: self.issue(TokenKind::Access, identity, now)?,
            refresh_token: self.issue(TokenKind::Refresh, identity, now)?,
        })
    }

    pub fn issue_register_token(&self, identity: &TokenIdentity) -> Result<String, TokenError> {
        self.issue(TokenKind::Register, identity, now_secs())
    }

    pub fn issue_forget_password_token(
        &self,
        identity: &TokenIdentity,
    ) -> Result<String, TokenError> {
        self.issue(TokenKind::ForgetPassword, identity, now_secs())
    }

    // ── Verify ───────────────────────────────────────────────────────────

    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<TokenIdentity, TokenError> {
        self.verify_at(token, expected, now_secs())
    }

    /// Check signature, then kind, then expiry. A token is valid iff `now < exp`.
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: u64,
    ) -> Result<TokenIdentity, TokenError> {
        let claims = decode_jwt(token, &self.settings.for_kind(expected).secret)?;
        if claims.kind != expected {
            return Err(TokenError::WrongKind);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        let id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| TokenError::Malformed)?;
        Ok(TokenIdentity {
            id,
            username: claims.username,
            email: claims.email,
        })
    }

    /// Verify a refresh token. Never rotates anything; re-issuing is the caller's job.
    pub fn verify_refresh_token(&self, token: &str) -> Result<TokenIdentity, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }
}

/// Current time in seconds since the UNIX epoch.
pub fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Three non-empty dot-separated segments.
pub fn has_jwt_shape(token: &str) -> bool {
    let parts: Vec<&str> = token.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty())
}

/// HS256 signature check only; `exp` is checked by the caller so the boundary rule
/// stays in one place.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}
