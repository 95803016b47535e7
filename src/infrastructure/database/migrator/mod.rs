//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_clients;
mod m20250301_000003_create_assignments;
mod m20250301_000004_create_schedules;
mod m20250301_000005_create_visit_logs;
mod m20250301_000006_create_audit_log;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_clients::Migration),
            Box::new(m20250301_000003_create_assignments::Migration),
            Box::new(m20250301_000004_create_schedules::Migration),
            Box::new(m20250301_000005_create_visit_logs::Migration),
            Box::new(m20250301_000006_create_audit_log::Migration),
        ]
    }
}
