pub use sea_orm_migration::prelude::*;

mod m20260110_000001_create_schema_and_base_db_setup;
mod m20260110_000002_create_core_tables;
mod m20260111_000001_add_chunks_and_embeddings;
mod m20260112_000001_add_project_mappings_and_task_dispatches;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_create_schema_and_base_db_setup::Migration),
            Box::new(m20260110_000002_create_core_tables::Migration),
            Box::new(m20260111_000001_add_chunks_and_embeddings::Migration),
            Box::new(m20260112_000001_add_project_mappings_and_task_dispatches::Migration),
        ]
    }
}
