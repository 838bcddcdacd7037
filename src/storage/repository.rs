use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::domain::{Transaction, User};

use super::{MIGRATION_001_KV_STORE, TRANSACTIONS_KEY, USER_KEY};

/// Local key-value persistence backed by a single SQLite table.
/// Values are JSON documents; the repository knows nothing about aggregation.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations. Safe to run on every start.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_KV_STORE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open (creating if needed) a database file and migrate it.
    pub async fn open(database_path: &str) -> Result<Self> {
        let repo = Self::connect(&format!("sqlite:{}?mode=rwc", database_path)).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// In-memory database, gone when the repository is dropped.
    pub async fn in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;
        let repo = Self::new(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Raw key-value operations
    // ========================

    /// Read the raw value stored under `key`.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Insert or replace the value stored under `key`.
    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }

    /// Remove `key`. Removing a missing key is not an error.
    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to remove key '{}'", key))?;
        Ok(())
    }

    // ========================
    // Transactions
    // ========================

    /// Load every stored transaction. A missing key means an empty collection.
    pub async fn load_transactions(&self) -> Result<Vec<Transaction>> {
        match self.get(TRANSACTIONS_KEY).await? {
            Some(json) => serde_json::from_str(&json).context("Stored transactions are corrupt"),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored collection with `transactions`.
    pub async fn save_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let json = serde_json::to_string(transactions)?;
        self.put(TRANSACTIONS_KEY, &json).await
    }

    // ========================
    // Session
    // ========================

    pub async fn load_user(&self) -> Result<Option<User>> {
        self.get(USER_KEY)
            .await?
            .map(|json| serde_json::from_str(&json).context("Stored user is corrupt"))
            .transpose()
    }

    pub async fn save_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.put(USER_KEY, &json).await
    }

    pub async fn clear_user(&self) -> Result<()> {
        self.remove(USER_KEY).await
    }
}
