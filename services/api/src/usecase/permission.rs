use uuid::Uuid;

use warden_domain::pagination::{Page, PageRequest};

use crate::domain::repository::PermissionRepository;
use crate::domain::types::PermissionRecord;
use crate::error::ApiError;

pub struct ListPermissionsUseCase<P: PermissionRepository> {
    pub permissions: P,
}

impl<P: PermissionRepository> ListPermissionsUseCase<P> {
    pub async fn execute(&self, page: PageRequest) -> Result<Page<PermissionRecord>, ApiError> {
        self.permissions.list(page).await
    }
}

pub struct GetPermissionUseCase<P: PermissionRepository> {
    pub permissions: P,
}

impl<P: PermissionRepository> GetPermissionUseCase<P> {
    pub async fn execute(&self, id: Uuid) -> Result<PermissionRecord, ApiError> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or(ApiError::PermissionNotFound)
    }
}
