pub use sea_orm_migration::prelude::*;

mod m20260901_000000_create_farm_tables;
mod m20260901_000001_create_reproduction_table;
mod m20260901_000002_create_message_table;
mod m20261015_000000_add_message_dedup_key;
mod m20261019_000000_create_doctor_and_health_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000000_create_farm_tables::Migration),
            Box::new(m20260901_000001_create_reproduction_table::Migration),
            Box::new(m20260901_000002_create_message_table::Migration),
            Box::new(m20261015_000000_add_message_dedup_key::Migration),
            Box::new(m20261019_000000_create_doctor_and_health_tables::Migration),
        ]
    }
}
