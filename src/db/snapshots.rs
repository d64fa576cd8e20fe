use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::{debug, info, warn};

use crate::models::MatchState;

/// SQLite store holding the serialized match in progress
pub struct SnapshotStore {
    pool: Pool<Sqlite>,
    key: String,
}

impl SnapshotStore {
    /// Open the store and initialize the database
    pub async fn new(database_url: &str, key: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        // Every connection to an in-memory database is a separate database
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self {
            pool,
            key: key.to_string(),
        };
        store.init_schema().await?;

        info!("Snapshot store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS match_snapshots (
                key TEXT PRIMARY KEY,
                payload TEXT NOT NULL,
                saved_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create match_snapshots table")?;

        Ok(())
    }

    /// Write the full match state, replacing the previous snapshot
    pub async fn save(&self, state: &MatchState) -> Result<()> {
        let payload = serde_json::to_string(state).context("Failed to serialize match state")?;

        sqlx::query(
            r#"
            INSERT INTO match_snapshots (key, payload, saved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at
            "#,
        )
        .bind(&self.key)
        .bind(&payload)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to save match snapshot")?;

        debug!("Saved snapshot ({} bytes)", payload.len());
        Ok(())
    }

    /// Read the saved match.
    ///
    /// A corrupt snapshot or one without both team names counts as no saved match.
    pub async fn load(&self) -> Result<Option<MatchState>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM match_snapshots WHERE key = ?")
                .bind(&self.key)
                .fetch_optional(&self.pool)
                .await
                .context("Failed to read match snapshot")?;

        let Some((payload,)) = row else {
            return Ok(None);
        };

        match decode_snapshot(&payload) {
            Ok(state) if state.config.has_teams() => Ok(Some(state)),
            Ok(_) => {
                debug!("Snapshot has no team names, ignoring");
                Ok(None)
            }
            Err(e) => {
                warn!("Ignoring unreadable snapshot: {}", e);
                Ok(None)
            }
        }
    }

    /// Remove every stored snapshot
    pub async fn clear(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM match_snapshots")
            .execute(&self.pool)
            .await
            .context("Failed to clear match snapshots")?;

        Ok(result.rows_affected())
    }
}

/// Parse a stored snapshot payload
pub fn decode_snapshot(payload: &str) -> crate::error::Result<MatchState> {
    Ok(serde_json::from_str(payload)?)
}
