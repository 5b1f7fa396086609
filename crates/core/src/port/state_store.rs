// State Store Port - transactional key-value access

use crate::domain::StateKey;
use crate::error::Result;
use async_trait::async_trait;

/// Transactional state store interface
///
/// The engine runs every public operation inside exactly one transaction
/// obtained here. Serialization between concurrent callers is the store's
/// concern; the engine assumes neither optimistic nor pessimistic control.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Begin a new transaction with snapshot-consistent reads
    async fn begin(&self) -> Result<Box<dyn StateTransaction>>;
}

/// Operations available within one open transaction
///
/// Reads observe the transaction's own uncommitted writes. Any failure is
/// fatal to the enclosing queue operation; the engine performs no retries.
#[async_trait]
pub trait StateTransaction: Send {
    /// Read a record, or None if the key is absent
    async fn get(&mut self, key: &StateKey) -> Result<Option<Vec<u8>>>;

    /// Write a record, creating or replacing it
    async fn put(&mut self, key: &StateKey, value: &[u8]) -> Result<()>;

    /// Create a record, failing with `DuplicateKey` if it already exists
    async fn insert(&mut self, key: &StateKey, value: &[u8]) -> Result<()>;

    /// Delete a record (absent keys are not an error)
    async fn delete(&mut self, key: &StateKey) -> Result<()>;

    /// List all records whose key starts with `prefix`, in key order
    async fn list_prefix(&mut self, prefix: &str) -> Result<Vec<(StateKey, Vec<u8>)>>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Roll back the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}
