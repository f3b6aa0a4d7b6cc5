pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20261016_000001_accounts;
mod m20261016_000002_links;
mod m20261016_000003_position_high_water;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261016_000001_accounts::Migration),
            Box::new(m20261016_000002_links::Migration),
            Box::new(m20261016_000003_position_high_water::Migration),
        ]
    }
}
