use sea_orm_migration::prelude::*;

mod create_tables_001;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(create_tables_001::Migration)]
    }
}
