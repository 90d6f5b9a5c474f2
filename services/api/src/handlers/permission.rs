use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use warden_core::serde::to_rfc3339_ms;
use warden_domain::pagination::Page;

use crate::domain::types::PermissionRecord;
use crate::error::ApiError;
use crate::handlers::extract::{PageQuery, parse_id};
use crate::state::AppState;
use crate::usecase::permission::{GetPermissionUseCase, ListPermissionsUseCase};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PermissionRecord> for PermissionResponse {
    fn from(p: PermissionRecord) -> Self {
        Self {
            id: p.id,
            name: p.name,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── GET /permissions ─────────────────────────────────────────────────────────

pub async fn list_permissions(
    State(state): State<AppState>,
    PageQuery(page): PageQuery,
) -> Result<Json<Page<PermissionResponse>>, ApiError> {
    let usecase = ListPermissionsUseCase {
        permissions: state.permission_repo(),
    };
    let permissions = usecase.execute(page).await?;
    Ok(Json(permissions.map(PermissionResponse::from)))
}

// ── GET /permissions/{id} ────────────────────────────────────────────────────

pub async fn get_permission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PermissionResponse>, ApiError> {
    let usecase = GetPermissionUseCase {
        permissions: state.permission_repo(),
    };
    let permission = usecase.execute(parse_id(&id)?).await?;
    Ok(Json(permission.into()))
}
