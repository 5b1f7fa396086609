// SQLite StateStore Implementation
//
// All queue records live in the queue_state KV table; one engine
// operation maps to one sqlx transaction held by SqliteStateTransaction.

use async_trait::async_trait;
use relayq_core::domain::StateKey;
use relayq_core::error::{AppError, Result};
use relayq_core::port::{StateStore, StateTransaction};
use sqlx::{Sqlite, SqlitePool, Transaction as SqlxTransaction};

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Storage(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Storage(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Storage(format!("Database full: {}", db_err.message())),
                    _ => AppError::Storage(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Storage(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Storage("Row not found".to_string()),
        _ => AppError::Storage(err.to_string()),
    }
}

// Inserts surface unique-key violations as DuplicateKey so the engine
// can tell them apart from other storage failures
fn map_insert_error(key: &StateKey, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(code) = db_err.code() {
            if matches!(code.as_ref(), "2067" | "1555") {
                return AppError::DuplicateKey(key.to_string());
            }
        }
    }
    map_sqlx_error(err)
}

pub struct SqliteStateStore {
    pool: SqlitePool,
}

impl SqliteStateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StateStore for SqliteStateStore {
    async fn begin(&self) -> Result<Box<dyn StateTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteStateTransaction { tx }))
    }
}

struct SqliteStateTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

#[async_trait]
impl StateTransaction for SqliteStateTransaction {
    async fn get(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>> {
        let value: Option<Vec<u8>> =
            sqlx::query_scalar("SELECT value FROM queue_state WHERE key = ?")
                .bind(key.as_str())
                .fetch_optional(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;

        Ok(value)
    }

    async fn put(&mut self, key: &StateKey, value: &[u8]) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queue_state (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert(&mut self, key: &StateKey, value: &[u8]) -> Result<()> {
        sqlx::query("INSERT INTO queue_state (key, value) VALUES (?, ?)")
            .bind(key.as_str())
            .bind(value)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_insert_error(key, e))?;

        Ok(())
    }

    async fn delete(&mut self, key: &StateKey) -> Result<()> {
        sqlx::query("DELETE FROM queue_state WHERE key = ?")
            .bind(key.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_prefix(&mut self, prefix: &str) -> Result<Vec<(StateKey, Vec<u8>)>> {
        let rows: Vec<(String, Vec<u8>)> = sqlx::query_as(
            r#"
            SELECT key, value FROM queue_state
            WHERE key LIKE ? || '%'
            ORDER BY key ASC
            "#,
        )
        .bind(prefix)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|(key, value)| (StateKey::from_raw(key), value))
            .collect())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db(name: &str) -> SqliteStateStore {
        // file-backed so every pooled connection sees the same database
        let db_path = format!("/tmp/relayq_test_{}.db", name);
        let _ = std::fs::remove_file(&db_path);

        let pool = create_pool(&db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteStateStore::new(pool)
    }

    fn key(s: &str) -> StateKey {
        StateKey::from_raw(s)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = setup_test_db("put_get").await;

        let mut tx = store.begin().await.unwrap();
        tx.put(&key("item:a"), b"payload").await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(
            tx.get(&key("item:a")).await.unwrap(),
            Some(b"payload".to_vec())
        );
        assert_eq!(tx.get(&key("item:missing")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let store = setup_test_db("put_replace").await;

        let mut tx = store.begin().await.unwrap();
        tx.put(&key("item:a"), b"old").await.unwrap();
        tx.put(&key("item:a"), b"new").await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.get(&key("item:a")).await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = setup_test_db("insert_dup").await;

        let mut tx = store.begin().await.unwrap();
        tx.insert(&key("item:a"), b"1").await.unwrap();
        let err = tx.insert(&key("item:a"), b"2").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let store = setup_test_db("rollback").await;

        let mut tx = store.begin().await.unwrap();
        tx.put(&key("item:a"), b"1").await.unwrap();
        tx.rollback().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.get(&key("item:a")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_and_reads_see_own_writes() {
        let store = setup_test_db("own_writes").await;

        let mut tx = store.begin().await.unwrap();
        tx.put(&key("item:a"), b"1").await.unwrap();
        assert_eq!(tx.get(&key("item:a")).await.unwrap(), Some(b"1".to_vec()));
        tx.delete(&key("item:a")).await.unwrap();
        assert_eq!(tx.get(&key("item:a")).await.unwrap(), None);
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_list_prefix_key_ordered() {
        let store = setup_test_db("list_prefix").await;

        let mut tx = store.begin().await.unwrap();
        tx.put(&key("item:b"), b"2").await.unwrap();
        tx.put(&key("item:a"), b"1").await.unwrap();
        tx.put(&key("pointer:head"), b"h").await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let listed = tx.list_prefix("item:").await.unwrap();
        let keys: Vec<_> = listed.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["item:a", "item:b"]);
    }
}
