//! Idempotent bootstrap data: roles and permissions from the registry, their
//! links, and an optional admin account.
//!
//! Seeders run in ascending [`Seeder::priority`]. Each one only inserts rows that
//! are missing, so running the full list twice is a no-op.

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use warden_core::password::hash_password;
use warden_domain::permission::{PermissionRegistry, RoleName};
use warden_domain::user::normalize_email;

use crate::domain::repository::{PermissionRepository, RoleRepository, UserRepository};
use crate::domain::types::{PermissionRecord, Role, User};
use crate::infra::db::{DbPermissionRepository, DbRoleRepository, DbUserRepository};
use crate::state::AppState;

const ADMIN_USERNAME: &str = "admin";

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

pub struct SeedContext {
    pub users: DbUserRepository,
    pub roles: DbRoleRepository,
    pub permissions: DbPermissionRepository,
    pub registry: Arc<PermissionRegistry>,
    pub admin: Option<AdminCredentials>,
}

impl SeedContext {
    pub fn from_state(state: &AppState) -> Self {
        let admin = match (&state.config.admin_email, &state.config.admin_password) {
            (Some(email), Some(password)) => Some(AdminCredentials {
                email: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        };
        Self {
            users: state.user_repo(),
            roles: state.role_repo(),
            permissions: state.permission_repo(),
            registry: state.registry.clone(),
            admin,
        }
    }
}

#[async_trait]
pub trait Seeder: Send + Sync {
    fn name(&self) -> &'static str;
    fn priority(&self) -> u32;
    async fn run(&self, ctx: &SeedContext) -> anyhow::Result<()>;
}

pub struct RoleSeeder;
pub struct PermissionSeeder;
pub struct RolePermissionSeeder;
pub struct AdminUserSeeder;

#[async_trait]
impl Seeder for RoleSeeder {
    fn name(&self) -> &'static str {
        "roles"
    }

    fn priority(&self) -> u32 {
        1
    }

    async fn run(&self, ctx: &SeedContext) -> anyhow::Result<()> {
        let created = seed_roles(&ctx.roles, &ctx.registry).await?;
        tracing::info!(seeder = self.name(), created, "seeded");
        Ok(())
    }
}

#[async_trait]
impl Seeder for PermissionSeeder {
    fn name(&self) -> &'static str {
        "permissions"
    }

    fn priority(&self) -> u32 {
        2
    }

    async fn run(&self, ctx: &SeedContext) -> anyhow::Result<()> {
        let created = seed_permissions(&ctx.permissions, &ctx.registry).await?;
        tracing::info!(seeder = self.name(), created, "seeded");
        Ok(())
    }
}

#[async_trait]
impl Seeder for RolePermissionSeeder {
    fn name(&self) -> &'static str {
        "role-permissions"
    }

    fn priority(&self) -> u32 {
        3
    }

    async fn run(&self, ctx: &SeedContext) -> anyhow::Result<()> {
        let linked = seed_role_permissions(&ctx.roles, &ctx.permissions, &ctx.registry).await?;
        tracing::info!(seeder = self.name(), linked, "seeded");
        Ok(())
    }
}

#[async_trait]
impl Seeder for AdminUserSeeder {
    fn name(&self) -> &'static str {
        "admin-user"
    }

    fn priority(&self) -> u32 {
        4
    }

    async fn run(&self, ctx: &SeedContext) -> anyhow::Result<()> {
        let Some(admin) = &ctx.admin else {
            tracing::info!(
                seeder = self.name(),
                "ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping"
            );
            return Ok(());
        };
        let created = seed_admin(&ctx.users, &ctx.roles, admin).await?;
        tracing::info!(seeder = self.name(), created, "seeded");
        Ok(())
    }
}

/// Every seeder, in execution order.
pub fn seeders() -> Vec<Box<dyn Seeder>> {
    let mut all: Vec<Box<dyn Seeder>> = vec![
        Box::new(AdminUserSeeder),
        Box::new(RolePermissionSeeder),
        Box::new(PermissionSeeder),
        Box::new(RoleSeeder),
    ];
    all.sort_by_key(|s| s.priority());
    all
}

/// Run every seeder, or only the one called `only`.
pub async fn run_all(ctx: &SeedContext, only: Option<&str>) -> anyhow::Result<()> {
    let selected: Vec<_> = seeders()
        .into_iter()
        .filter(|s| only.is_none_or(|name| s.name() == name))
        .collect();
    if selected.is_empty() {
        anyhow::bail!("unknown seeder: {}", only.unwrap_or_default());
    }
    for seeder in selected {
        tracing::info!(seeder = seeder.name(), priority = seeder.priority(), "running seeder");
        seeder
            .run(ctx)
            .await
            .with_context(|| format!("seeder {} failed", seeder.name()))?;
    }
    Ok(())
}

// ── Seeding steps ────────────────────────────────────────────────────────────

/// Insert every registry role that is missing. Returns how many were created.
pub async fn seed_roles<R: RoleRepository>(
    roles: &R,
    registry: &PermissionRegistry,
) -> anyhow::Result<usize> {
    let mut created = 0;
    for name in registry.roles() {
        if roles.find_by_name(name.as_str()).await?.is_some() {
            continue;
        }
        let now = Utc::now();
        roles
            .create(&Role {
                id: Uuid::new_v4(),
                name: name.as_str().to_owned(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

/// Insert every registry permission that is missing.
pub async fn seed_permissions<P: PermissionRepository>(
    permissions: &P,
    registry: &PermissionRegistry,
) -> anyhow::Result<usize> {
    let mut created = 0;
    for permission in registry.all_permissions() {
        if permissions
            .find_by_name(permission.as_str())
            .await?
            .is_some()
        {
            continue;
        }
        let now = Utc::now();
        permissions
            .create(&PermissionRecord {
                id: Uuid::new_v4(),
                name: permission.as_str().to_owned(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        created += 1;
    }
    Ok(created)
}

/// Link each role to the permissions the registry grants it. Roles or
/// permissions without a row are skipped with a warning.
pub async fn seed_role_permissions<R, P>(
    roles: &R,
    permissions: &P,
    registry: &PermissionRegistry,
) -> anyhow::Result<usize>
where
    R: RoleRepository,
    P: PermissionRepository,
{
    let mut linked = 0;
    for name in registry.roles() {
        let Some(role) = roles.find_by_name(name.as_str()).await? else {
            tracing::warn!(role = %name, "role row missing, skipping links");
            continue;
        };
        for permission in registry.permissions_for(name.as_str()) {
            let Some(record) = permissions.find_by_name(permission.as_str()).await? else {
                tracing::warn!(permission = %permission, "permission row missing, skipping link");
                continue;
            };
            if roles.link_permission(role.id, record.id).await? {
                linked += 1;
            }
        }
    }
    Ok(linked)
}

/// Create the verified admin account if no user owns `admin.email`.
pub async fn seed_admin<U, R>(
    users: &U,
    roles: &R,
    admin: &AdminCredentials,
) -> anyhow::Result<bool>
where
    U: UserRepository,
    R: RoleRepository,
{
    let email = normalize_email(&admin.email);
    if users.find_by_email(&email).await?.is_some() {
        return Ok(false);
    }
    let role = roles
        .find_by_name(RoleName::ADMIN.as_str())
        .await?
        .context("admin role missing, run the roles seeder first")?;
    let now = Utc::now();
    users
        .create(&User {
            id: Uuid::new_v4(),
            username: ADMIN_USERNAME.to_owned(),
            email,
            password: Some(hash_password(&admin.password).context("hash admin password")?),
            email_verified_at: Some(now),
            social_id: None,
            social_type: None,
            role: Some(role),
            created_at: now,
            updated_at: now,
        })
        .await?;
    Ok(true)
}
