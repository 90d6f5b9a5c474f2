use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use warden_core::serde::to_rfc3339_ms;
use warden_core::validation::{FieldErrors, Validate};
use warden_domain::pagination::Page;

use crate::domain::types::{ROLE_NAME_MAX_LEN, Role};
use crate::error::ApiError;
use crate::handlers::auth::MessageResponse;
use crate::handlers::extract::{PageQuery, ValidatedJson, parse_id};
use crate::state::AppState;
use crate::usecase::role::{
    CreateRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, ListRolesUseCase, UpdateRoleUseCase,
};

/// Role as embedded in a user payload.
#[derive(Debug, Serialize)]
pub struct RoleSummary {
    pub id: Uuid,
    pub name: String,
}

impl From<Role> for RoleSummary {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Role> for RoleResponse {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct RoleRequest {
    pub name: String,
}

impl Validate for RoleRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.length("name", self.name.trim(), 1, ROLE_NAME_MAX_LEN);
        errors.into_result()
    }
}

// ── POST /roles ──────────────────────────────────────────────────────────────

pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), ApiError> {
    let usecase = CreateRoleUseCase {
        roles: state.role_repo(),
    };
    let role = usecase.execute(body.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

// ── GET /roles ───────────────────────────────────────────────────────────────

pub async fn list_roles(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<Page<RoleResponse>>, ApiError> {
    let usecase = ListRolesUseCase {
        roles: state.role_repo(),
    };
    let roles = usecase.execute(page).await?;
    Ok(Json(roles.map(RoleResponse::from)))
}

// ── GET /roles/{id} ──────────────────────────────────────────────────────────

pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoleResponse>, ApiError> {
    let usecase = GetRoleUseCase {
        roles: state.role_repo(),
    };
    let role = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(role.into()))
}

// ── PATCH /roles/{id} ────────────────────────────────────────────────────────

pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<RoleRequest>,
) -> Result<Json<RoleResponse>, ApiError> {
    let usecase = UpdateRoleUseCase {
        roles: state.role_repo(),
    };
    let role = usecase.execute(parse_id(&id)?, body.name.trim()).await?;
    Ok(Json(role.into()))
}

// ── DELETE /roles/{id} ───────────────────────────────────────────────────────

pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let usecase = DeleteRoleUseCase {
        roles: state.role_repo(),
    };
    usecase.execute(id).await?;
    Ok(MessageResponse::new(format!(
        "Role with id {id} has been deleted"
    )))
}
