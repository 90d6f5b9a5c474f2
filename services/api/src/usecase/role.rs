use chrono::Utc;
use uuid::Uuid;

use warden_domain::pagination::{Page, PageRequest};

use crate::domain::repository::RoleRepository;
use crate::domain::types::Role;
use crate::error::ApiError;

// ── CreateRole ───────────────────────────────────────────────────────────────

pub struct CreateRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> CreateRoleUseCase<R> {
    pub async fn execute(&self, name: &str) -> Result<Role, ApiError> {
        let name = name.trim();
        if self.roles.find_by_name(name).await?.is_some() {
            return Err(ApiError::RoleAlreadyExists);
        }
        let now = Utc::now();
        let role = Role {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.roles.create(&role).await?;
        Ok(role)
    }
}

// ── ListRoles ────────────────────────────────────────────────────────────────

pub struct ListRolesUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> ListRolesUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<Role>, ApiError> {
        self.roles.list(page).await
    }
}

// ── GetRole ──────────────────────────────────────────────────────────────────

pub struct GetRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> GetRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Role, ApiError> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RoleNotFound)
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

pub struct UpdateRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> UpdateRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid, name: &str) -> Result<Role, ApiError> {
        let name = name.trim();
        if let Some(existing) = self.roles.find_by_name(name).await? {
            if existing.id != id {
                return Err(ApiError::RoleAlreadyExists);
            }
        }
        if !self.roles.update_name(id, name).await? {
            return Err(ApiError::RoleNotFound);
        }
        self.roles
            .find_by_id(id)
            .await?
            .ok_or(ApiError::RoleNotFound)
    }
}

// ── DeleteRole ───────────────────────────────────────────────────────────────

pub struct DeleteRoleUseCase<R: RoleRepository> {
    pub roles: R,
}

impl<R: RoleRepository> DeleteRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.roles.soft_delete(id).await? {
            return Err(ApiError::RoleNotFound);
        }
        tracing::info!(role_id = %id, "role soft-deleted");
        Ok(())
    }
}
