pub use sea_orm_migration::prelude::*;

mod m20170624_092243_ledger_entries;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20170624_092243_ledger_entries::Migration)]
    }
}
