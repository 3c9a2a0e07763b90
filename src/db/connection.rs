// SQLite connection pool setup: create the database file when missing, switch
// file databases to WAL, then run migrations.

use crate::db::migration::run_migrations;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Pool, Sqlite};
use tracing::info;

pub async fn establish_connection(database_url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    // Create database if it doesn't exist
    if !in_memory && !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url).await?;
    }

    // An in-memory database lives and dies with its connection, so keep exactly one.
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await?
    } else {
        let pool = SqlitePoolOptions::new().connect(database_url).await?;
        sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;
        pool
    };

    run_migrations(&pool).await?;

    Ok(pool)
}
