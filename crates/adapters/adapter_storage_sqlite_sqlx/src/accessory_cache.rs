//! `SQLite` implementation of [`AccessoryCache`].

use std::future::Future;
use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use buttonhub_app::ports::AccessoryCache;
use buttonhub_domain::accessory::CachedAccessory;
use buttonhub_domain::error::BridgeError;
use buttonhub_domain::id::AccessoryId;
use buttonhub_domain::time::now;

use crate::error::StorageError;

/// Wrapper for converting database rows into a [`CachedAccessory`].
struct Wrapper(CachedAccessory);

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let class_name: String = row.try_get("class_name")?;
        let version: String = row.try_get("version")?;
        let name: String = row.try_get("name")?;
        let context: String = row.try_get("context")?;

        let id = AccessoryId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        // Unreadable blobs surface as a null context and get discarded on restore.
        let context = serde_json::from_str(&context).unwrap_or_else(|err| {
            tracing::warn!(%id, error = %err, "cached accessory context is not valid JSON");
            serde_json::Value::Null
        });

        Ok(Self(CachedAccessory {
            class_name,
            version,
            id,
            name,
            context,
        }))
    }
}

const SELECT_ALL: &str = "SELECT * FROM accessories ORDER BY rowid";
const UPSERT: &str = "INSERT INTO accessories (id, class_name, version, name, context, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?) \
     ON CONFLICT(id) DO UPDATE SET class_name = excluded.class_name, \
     version = excluded.version, name = excluded.name, \
     context = excluded.context, updated_at = excluded.updated_at";
const DELETE_BY_ID: &str = "DELETE FROM accessories WHERE id = ?";

/// `SQLite`-backed accessory cache.
pub struct SqliteAccessoryCache {
    pool: SqlitePool,
}

impl SqliteAccessoryCache {
    /// Create a new cache using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AccessoryCache for SqliteAccessoryCache {
    fn load_all(&self) -> impl Future<Output = Result<Vec<CachedAccessory>, BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
                .fetch_all(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|w| w.0).collect())
        }
    }

    fn save(
        &self,
        accessory: CachedAccessory,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            let context = serde_json::to_string(&accessory.context).map_err(StorageError::from)?;
            sqlx::query(UPSERT)
                .bind(accessory.id.to_string())
                .bind(&accessory.class_name)
                .bind(&accessory.version)
                .bind(&accessory.name)
                .bind(context)
                .bind(now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }

    fn remove(&self, id: AccessoryId) -> impl Future<Output = Result<(), BridgeError>> + Send {
        let pool = self.pool.clone();
        async move {
            sqlx::query(DELETE_BY_ID)
                .bind(id.to_string())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
