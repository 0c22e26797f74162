//! Whitelist persistence for the vCard bot.
//!
//! The whitelist is the set of Telegram user IDs allowed to run the pipeline.
//! Access goes through the [`AuthorizationStore`] capability so the bot layer
//! never touches a concrete store directly; the sqlite implementation is the
//! production one, the in-memory implementation backs tests and ephemeral
//! deployments.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use std::collections::BTreeSet;
use tokio::sync::Mutex;
use tracing::info;

/// Capability for checking and managing authorized user IDs
#[async_trait]
pub trait AuthorizationStore: Send + Sync {
    /// Whether this user may run the pipeline
    async fn is_authorized(&self, user_id: i64) -> Result<bool>;
    /// Add a user; returns false when already present
    async fn add(&self, user_id: i64) -> Result<bool>;
    /// Remove a user; returns false when absent
    async fn remove(&self, user_id: i64) -> Result<bool>;
    /// All authorized user IDs, ascending
    async fn list(&self) -> Result<Vec<i64>>;
}

/// Whitelist store backed by a sqlite database
pub struct SqliteAuthStore {
    pool: SqlitePool,
}

impl SqliteAuthStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the whitelist schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing whitelist schema...");

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS whitelist (
                user_id INTEGER PRIMARY KEY,
                added_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create whitelist table")?;

        info!("Whitelist schema initialized successfully");
        Ok(())
    }
}

#[async_trait]
impl AuthorizationStore for SqliteAuthStore {
    async fn is_authorized(&self, user_id: i64) -> Result<bool> {
        let row = sqlx::query("SELECT user_id FROM whitelist WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query whitelist")?;
        Ok(row.is_some())
    }

    async fn add(&self, user_id: i64) -> Result<bool> {
        let result =
            sqlx::query("INSERT OR IGNORE INTO whitelist (user_id, added_at) VALUES (?1, ?2)")
                .bind(user_id)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&self.pool)
                .await
                .context("Failed to insert into whitelist")?;

        let inserted = result.rows_affected() > 0;
        if inserted {
            info!(user_id, "User added to whitelist");
        }
        Ok(inserted)
    }

    async fn remove(&self, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM whitelist WHERE user_id = ?1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete from whitelist")?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!(user_id, "User removed from whitelist");
        }
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<i64>> {
        let rows = sqlx::query("SELECT user_id FROM whitelist ORDER BY user_id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list whitelist")?;
        Ok(rows.iter().map(|row| row.get::<i64, _>(0)).collect())
    }
}

/// In-memory whitelist store for tests and ephemeral deployments
#[derive(Default)]
pub struct MemoryAuthStore {
    users: Mutex<BTreeSet<i64>>,
}

impl MemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationStore for MemoryAuthStore {
    async fn is_authorized(&self, user_id: i64) -> Result<bool> {
        Ok(self.users.lock().await.contains(&user_id))
    }

    async fn add(&self, user_id: i64) -> Result<bool> {
        Ok(self.users.lock().await.insert(user_id))
    }

    async fn remove(&self, user_id: i64) -> Result<bool> {
        Ok(self.users.lock().await.remove(&user_id))
    }

    async fn list(&self) -> Result<Vec<i64>> {
        Ok(self.users.lock().await.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() -> Result<()> {
        let store = MemoryAuthStore::new();

        assert!(!store.is_authorized(42).await?);
        assert!(store.add(42).await?);
        assert!(!store.add(42).await?); // already present
        assert!(store.is_authorized(42).await?);

        assert!(store.remove(42).await?);
        assert!(!store.remove(42).await?); // already gone
        assert!(!store.is_authorized(42).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_list_sorted() -> Result<()> {
        let store = MemoryAuthStore::new();
        store.add(3).await?;
        store.add(1).await?;
        store.add(2).await?;

        assert_eq!(store.list().await?, vec![1, 2, 3]);
        Ok(())
    }
}
