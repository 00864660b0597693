//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_tenancy;
mod m20260301_000002_registries;
mod m20260301_000003_ledger;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_tenancy::Migration),
            Box::new(m20260301_000002_registries::Migration),
            Box::new(m20260301_000003_ledger::Migration),
        ]
    }
}
