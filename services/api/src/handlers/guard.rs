use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use warden_auth_types::bearer::BearerToken;

use crate::domain::access::Operation;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::authorize::AuthorizeUseCase;

/// Middleware state: the app plus the operation the guarded route performs.
#[derive(Clone)]
pub struct GuardState {
    pub app: AppState,
    pub op: Operation,
}

/// Route middleware enforcing the route policy for `op`.
/// Attach with `route_layer(from_fn_with_state(GuardState { .. }, authorize))`.
pub async fn authorize(
    State(guard): State<GuardState>,
    bearer: BearerToken,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let usecase = AuthorizeUseCase {
        users: guard.app.user_repo(),
        tokens: guard.app.tokens.clone(),
        registry: guard.app.registry.clone(),
        policy: guard.app.policy.clone(),
    };
    if let Some(user) = usecase.execute(bearer.as_deref(), guard.op).await? {
        req.extensions_mut().insert(CurrentUser(user));
    }
    Ok(next.run(req).await)
}

/// Caller resolved by [`authorize`]. Only present on non-public routes.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts.extensions.get::<CurrentUser>().cloned();
        async move { user.ok_or(ApiError::Unauthorized) }
    }
}
