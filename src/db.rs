use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};

use crate::error::AppResult;

const PRAGMAS: [&str; 3] =
    ["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL", "PRAGMA cache_size=-64000"];

pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url.to_string());
    opts.sqlx_logging(false);
    // Every connection to an in-memory database gets its own empty database.
    if is_in_memory(database_url) {
        opts.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opts).await?;

    for pragma in PRAGMAS {
        db.execute(Statement::from_string(db.get_database_backend(), pragma.to_string())).await?;
    }

    Migrator::up(&db, None).await?;
    tracing::info!("collection store ready");
    Ok(db)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}
