//! Helpers shared by unit tests.

use crate::migrator::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh migrated in-memory database. One connection, so every query sees
/// the same SQLite instance.
pub async fn memory_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await.expect("connect in-memory db");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}
