use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_core::serde::{to_rfc3339_ms, to_rfc3339_ms_opt};
use warden_core::validation::{FieldErrors, Validate};
use warden_domain::pagination::Page;

use crate::domain::types::{USERNAME_MAX_LEN, User};
use crate::error::ApiError;
use crate::handlers::auth::MessageResponse;
use crate::handlers::extract::{PageQuery, ValidatedJson, parse_id};
use crate::handlers::guard::CurrentUser;
use crate::handlers::role::RoleSummary;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateProfileUseCase,
};

/// Public user shape. The password hash never leaves the service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "to_rfc3339_ms_opt")]
    pub email_verified_at: Option<DateTime<Utc>>,
    pub social_type: Option<&'static str>,
    pub role: Option<RoleSummary>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            email_verified_at: u.email_verified_at,
            social_type: u.social_type.map(|p| p.as_str()),
            role: u.role.map(RoleSummary::from),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<Page<UserResponse>>, ApiError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(page).await?;
    Ok(Json(users.map(UserResponse::from)))
}

// ── GET /users/profile ───────────────────────────────────────────────────────

pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/update-profile ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.length("username", self.username.trim(), 1, USERNAME_MAX_LEN);
        errors.into_result()
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user.id, body.username.trim()).await?;
    Ok(MessageResponse::new("Update profile success"))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(MessageResponse::new(format!(
        "user with id {id} has been deleted"
    )))
}
