use uuid::Uuid;

use warden_domain::pagination::{Page, PageRequest};

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::ApiError;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<User>, ApiError> {
        self.users.list(page).await
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(&self, user_id: Uuid, username: &str) -> Result<(), ApiError> {
        if !self.users.update_profile(user_id, username.trim()).await? {
            return Err(ApiError::UpdateFailed);
        }
        Ok(())
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    /// Soft delete. Unknown and already-deleted users are both `UserNotFound`.
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.users.soft_delete(id).await? {
            return Err(ApiError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user soft-deleted");
        Ok(())
    }
}
