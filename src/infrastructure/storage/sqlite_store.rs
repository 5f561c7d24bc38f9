use crate::application::ports::KeyValueStore;
use crate::domain::value_objects::KeyPattern;
use crate::shared::error::OfflineError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

/// SQLx-backed key-value store over a single `kv_store` table.
///
/// Each statement is its own implicit transaction, which is exactly the
/// per-key atomicity the port promises and nothing stronger.
pub struct SqliteKeyValueStore {
    pool: Pool<Sqlite>,
}

impl SqliteKeyValueStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), OfflineError> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, OfflineError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn remove(&self, key: &str) -> Result<(), OfflineError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn keys_matching(&self, pattern: &KeyPattern) -> Result<Vec<String>, OfflineError> {
        let rows = sqlx::query("SELECT key FROM kv_store WHERE key LIKE ?1 ESCAPE '\\'")
            .bind(glob_to_like(pattern.as_str()))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.get("key")).collect())
    }
}

/// Translates a `*` glob into a LIKE pattern. Literal `%`, `_` and `\` in
/// keys are escaped so underscore-delimited keys do not match by accident.
fn glob_to_like(pattern: &str) -> String {
    let mut like = String::with_capacity(pattern.len() + 4);
    for ch in pattern.chars() {
        match ch {
            '*' => like.push('%'),
            '%' => like.push_str("\\%"),
            '_' => like.push_str("\\_"),
            '\\' => like.push_str("\\\\"),
            other => like.push(other),
        }
    }
    like
}
