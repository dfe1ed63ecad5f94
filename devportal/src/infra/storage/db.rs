//! Database connection helpers.

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use crate::infra::storage::migrations::Migrator;

/// Connect to the datastore and bring the schema up to date.
///
/// # Errors
///
/// Returns the underlying error when the connection cannot be
/// established or a migration fails.
pub async fn connect_and_migrate(url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    // Each pooled connection to an in-memory SQLite URL opens its own
    // database, so the pool must stay at exactly one live connection.
    if url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }
    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
