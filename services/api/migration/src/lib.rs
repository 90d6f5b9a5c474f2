use sea_orm_migration::prelude::*;

mod m20260401_000001_create_roles;
mod m20260401_000002_create_permissions;
mod m20260401_000003_create_role_permissions;
mod m20260401_000004_create_users;
mod m20260401_000005_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_roles::Migration),
            Box::new(m20260401_000002_create_permissions::Migration),
            Box::new(m20260401_000003_create_role_permissions::Migration),
            Box::new(m20260401_000004_create_users::Migration),
            Box::new(m20260401_000005_create_outbox_events::Migration),
        ]
    }
}
