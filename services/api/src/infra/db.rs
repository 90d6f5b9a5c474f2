use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use warden_api_schema::{outbox_events, permissions, role_permissions, roles, users};
use warden_domain::pagination::{Page, PageRequest};
use warden_domain::user::{SocialProvider, normalize_email};

use crate::domain::repository::{PermissionRepository, RoleRepository, UserRepository};
use crate::domain::types::{OutboxEvent, PermissionRecord, Role, User};
use crate::error::ApiError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    async fn find_one(
        &self,
        filter: sea_orm::Condition,
        what: &'static str,
    ) -> Result<Option<User>, ApiError> {
        let row = users::Entity::find()
            .filter(filter)
            .filter(users::Column::DeletedAt.is_null())
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await
            .context(what)?;
        Ok(row.map(|(user, role)| user_from_model(user, role)))
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let cond = sea_orm::Condition::all().add(users::Column::Email.eq(normalize_email(email)));
        self.find_one(cond, "find user by email").await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let cond = sea_orm::Condition::all().add(users::Column::Id.eq(id));
        self.find_one(cond, "find user by id").await
    }

    async fn find_by_social_id(
        &self,
        provider: SocialProvider,
        social_id: &str,
    ) -> Result<Option<User>, ApiError> {
        let cond = sea_orm::Condition::all()
            .add(users::Column::SocialType.eq(provider.as_str()))
            .add(users::Column::SocialId.eq(social_id));
        self.find_one(cond, "find user by social id").await
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            email: Set(normalize_email(&user.email)),
            password: Set(user.password.clone()),
            email_verified_at: Set(user.email_verified_at),
            social_id: Set(user.social_id.clone()),
            social_type: Set(user.social_type.map(|p| p.as_str().to_owned())),
            role_id: Set(user.role.as_ref().map(|r| r.id)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            // Email still held by a soft-deleted row, or a concurrent registration.
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailAlreadyRegistered),
            Err(e) => Err(anyhow::Error::from(e).context("create user").into()),
        }
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Password, Expr::value(password_hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("update user password")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_email_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        users::Entity::update_many()
            .col_expr(users::Column::EmailVerifiedAt, Expr::value(at))
            .col_expr(users::Column::UpdatedAt, Expr::value(at))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::EmailVerifiedAt.is_null())
            .exec(&self.db)
            .await
            .context("mark email verified")?;
        Ok(())
    }

    async fn update_profile(&self, id: Uuid, username: &str) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Username, Expr::value(username))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("update user profile")?;
        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete user")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, ApiError> {
        let total = users::Entity::find()
            .filter(users::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .context("count users")?;
        let rows = users::Entity::find()
            .filter(users::Column::DeletedAt.is_null())
            .find_also_related(roles::Entity)
            .order_by_asc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list users")?;
        let data = rows
            .into_iter()
            .map(|(user, role)| user_from_model(user, role))
            .collect();
        Ok(Page::new(data, page, total))
    }
}

fn user_from_model(model: users::Model, role: Option<roles::Model>) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password: model.password,
        email_verified_at: model.email_verified_at,
        social_id: model.social_id,
        social_type: model.social_type.as_deref().and_then(SocialProvider::parse),
        role: role.filter(|r| r.deleted_at.is_none()).map(role_from_model),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, ApiError> {
        let model = roles::Entity::find_by_id(id)
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by id")?;
        Ok(model.map(role_from_model))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, ApiError> {
        let model = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by name")?;
        Ok(model.map(role_from_model))
    }

    async fn create(&self, role: &Role) -> Result<(), ApiError> {
        let result = roles::ActiveModel {
            id: Set(role.id),
            name: Set(role.name.clone()),
            created_at: Set(role.created_at),
            updated_at: Set(role.updated_at),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(ApiError::RoleAlreadyExists),
            Err(e) => Err(anyhow::Error::from(e).context("create role").into()),
        }
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<bool, ApiError> {
        let result = roles::Entity::update_many()
            .col_expr(roles::Column::Name, Expr::value(name))
            .col_expr(roles::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(roles::Column::Id.eq(id))
            .filter(roles::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await;
        match result {
            Ok(r) => Ok(r.rows_affected > 0),
            Err(e) if is_unique_violation(&e) => Err(ApiError::RoleAlreadyExists),
            Err(e) => Err(anyhow::Error::from(e).context("update role name").into()),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = roles::Entity::update_many()
            .col_expr(roles::Column::DeletedAt, Expr::value(Utc::now()))
            .filter(roles::Column::Id.eq(id))
            .filter(roles::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete role")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Role>, ApiError> {
        let total = roles::Entity::find()
            .filter(roles::Column::DeletedAt.is_null())
            .count(&self.db)
            .await
            .context("count roles")?;
        let models = roles::Entity::find()
            .filter(roles::Column::DeletedAt.is_null())
            .order_by_asc(roles::Column::Name)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list roles")?;
        let data = models.into_iter().map(role_from_model).collect();
        Ok(Page::new(data, page, total))
    }

    async fn link_permission(&self, role_id: Uuid, permission_id: Uuid) -> Result<bool, ApiError> {
        let inserted = role_permissions::Entity::insert(role_permissions::ActiveModel {
            role_id: Set(role_id),
            permission_id: Set(permission_id),
        })
        .on_conflict(
            OnConflict::columns([
                role_permissions::Column::RoleId,
                role_permissions::Column::PermissionId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("link role permission")?;
        Ok(inserted > 0)
    }
}

fn role_from_model(model: roles::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Permission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPermissionRepository {
    pub db: DatabaseConnection,
}

impl PermissionRepository for DbPermissionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PermissionRecord>, ApiError> {
        let model = permissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find permission by id")?;
        Ok(model.map(permission_from_model))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<PermissionRecord>, ApiError> {
        let model = permissions::Entity::find()
            .filter(permissions::Column::Name.eq(name))
            .one(&self.db)
            .await
            .context("find permission by name")?;
        Ok(model.map(permission_from_model))
    }

    async fn create(&self, permission: &PermissionRecord) -> Result<(), ApiError> {
        permissions::ActiveModel {
            id: Set(permission.id),
            name: Set(permission.name.clone()),
            created_at: Set(permission.created_at),
            updated_at: Set(permission.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create permission")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<PermissionRecord>, ApiError> {
        let total = permissions::Entity::find()
            .count(&self.db)
            .await
            .context("count permissions")?;
        let models = permissions::Entity::find()
            .order_by_asc(permissions::Column::Name)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await
            .context("list permissions")?;
        let data = models.into_iter().map(permission_from_model).collect();
        Ok(Page::new(data, page, total))
    }
}

fn permission_from_model(model: permissions::Model) -> PermissionRecord {
    PermissionRecord {
        id: model.id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Outbox ───────────────────────────────────────────────────────────────────

/// Insert an outbox event. A duplicate idempotency key is treated as already queued.
pub async fn insert_outbox_event(
    db: &DatabaseConnection,
    event: &OutboxEvent,
) -> Result<(), ApiError> {
    let now = Utc::now();
    outbox_events::Entity::insert(outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    })
    .on_conflict(
        OnConflict::column(outbox_events::Column::IdempotencyKey)
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await
    .context("insert outbox event")?;
    Ok(())
}
