use std::sync::Arc;

use warden_auth_types::token::{TokenKind, TokenService};
use warden_domain::permission::PermissionRegistry;

use crate::domain::access::{Access, Operation, RoutePolicy};
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

/// Per-request guard: bearer token → live user → role permissions vs. operation policy.
pub struct AuthorizeUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: Arc<TokenService>,
    pub registry: Arc<PermissionRegistry>,
    pub policy: Arc<RoutePolicy>,
}

impl<U: UserRepository> AuthorizeUseCase<U> {
    /// `Ok(None)` for public operations, `Ok(Some(user))` once the caller is allowed.
    pub async fn execute(
        &self,
        bearer: Option<&str>,
        op: Operation,
    ) -> Result<Option<User>, ApiError> {
        let access = self.policy.access_for(op);
        if access == Access::Public {
            return Ok(None);
        }

        let token = bearer.ok_or(ApiError::Unauthorized)?;
        let identity = self
            .tokens
            .verify(token, TokenKind::Access)
            .map_err(|e| {
                tracing::debug!(operation = ?op, reason = %e, "access token rejected");
                ApiError::InvalidToken
            })?;

        // Role is resolved from the store, never from the token.
        let user = self
            .users
            .find_by_id(identity.id)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if let Access::AnyOf(required) = &access {
            let allowed = user
                .role_name()
                .is_some_and(|role| self.registry.allows_any(role, required));
            if !allowed {
                tracing::debug!(
                    user_id = %user.id,
                    role = user.role_name().unwrap_or("-"),
                    operation = ?op,
                    "permission denied"
                );
                return Err(ApiError::Forbidden);
            }
        }

        Ok(Some(user))
    }
}
