//! `SQLite` connection pool setup and migration runner.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::StorageError;

/// Configuration for the `SQLite` storage adapter.
pub struct Config {
    /// `SQLite` connection URL (e.g. `sqlite:buttonhub.db` or `sqlite::memory:`).
    pub database_url: String,
}

impl Config {
    /// Build a [`Database`] from this configuration.
    ///
    /// Creates the database file if missing and runs pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the connection or migrations fail.
    pub async fn build(self) -> Result<Database, StorageError> {
        Database::initialize(&self.database_url).await
    }
}

/// An in-memory database lives exactly as long as its single connection,
/// so that connection is pinned: never reaped when idle, never recycled.
fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
    }
}

/// Holds the `SQLite` connection pool.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn initialize(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = pool_options(database_url).connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::debug!(url = %database_url, "accessory cache database ready");

        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_create_accessories_table_when_using_memory_db() {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'accessories'",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        assert_eq!(tables.len(), 1, "missing accessories table");
    }

    #[test]
    fn should_pin_single_connection_when_database_is_in_memory() {
        let options = pool_options("sqlite::memory:");

        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert!(options.get_idle_timeout().is_none());
        assert!(options.get_max_lifetime().is_none());
    }

    #[test]
    fn should_keep_default_pool_for_file_database() {
        let options = pool_options("sqlite:buttonhub.db");

        assert!(options.get_max_connections() > 1);
        assert!(options.get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn should_keep_memory_rows_across_connection_checkouts() {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();

        {
            let mut conn = db.pool().acquire().await.unwrap();
            sqlx::query(
                "INSERT INTO accessories (id, class_name, version, name, context, updated_at) \
                 VALUES ('a', 'ButtonAccessory', '1', 'Kitchen', '{}', '2026-01-01T00:00:00Z')",
            )
            .execute(&mut *conn)
            .await
            .unwrap();
        }

        let mut conn = db.pool().acquire().await.unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accessories")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn should_fail_when_url_is_not_sqlite() {
        let result = Config {
            database_url: "postgres://localhost/buttons".to_string(),
        }
        .build()
        .await;

        assert!(result.is_err());
    }
}
