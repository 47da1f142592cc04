use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

use shared::domain::RowId;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub row_id: RowId,
    pub content: String,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        // Every connection to `:memory:` opens its own empty database.
        let max_connections = if is_memory_url(database_url) { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Appends a new unseen row and returns its id.
    pub async fn insert_message(&self, content: &str) -> Result<RowId> {
        let rec = sqlx::query(
            "INSERT INTO messages (content, seen, created_at) VALUES (?, 0, ?) RETURNING id",
        )
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert message")?;
        let row_id = RowId(rec.get::<i64, _>(0));
        debug!(%row_id, "message stored");
        Ok(row_id)
    }

    /// Rows whose seen flag is clear, in insertion order.
    pub async fn list_unseen_messages(&self) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query(
            "SELECT id, content, seen, created_at
             FROM messages
             WHERE seen = 0
             ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list unseen messages")?;

        Ok(rows
            .into_iter()
            .map(|r| StoredMessage {
                row_id: RowId(r.get::<i64, _>(0)),
                content: r.get::<String, _>(1),
                seen: r.get::<bool, _>(2),
                created_at: r.get::<DateTime<Utc>, _>(3),
            })
            .collect())
    }

    pub async fn load_message(&self, row_id: RowId) -> Result<Option<StoredMessage>> {
        let row = sqlx::query("SELECT id, content, seen, created_at FROM messages WHERE id = ?")
            .bind(row_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| StoredMessage {
            row_id: RowId(r.get::<i64, _>(0)),
            content: r.get::<String, _>(1),
            seen: r.get::<bool, _>(2),
            created_at: r.get::<DateTime<Utc>, _>(3),
        }))
    }

    /// Sets the seen flag on one row. Returns `false` when the row does not
    /// exist; marking an already-seen row succeeds.
    pub async fn mark_seen(&self, row_id: RowId) -> Result<bool> {
        let updated = sqlx::query("UPDATE messages SET seen = 1 WHERE id = ?")
            .bind(row_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to mark message {row_id} seen"))?;
        Ok(updated.rows_affected() > 0)
    }

    pub async fn count_unseen(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE seen = 0")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
