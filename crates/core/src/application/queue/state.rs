// Shared record access for queue operations
//
// Item and pointer records are stored as JSON bytes under their derived
// keys; everything here goes through the open transaction so reads see
// the operation's own writes.

use crate::domain::{DomainError, ItemId, PointerName, QueueItem, QueuePointer, StateKey};
use crate::error::Result;
use crate::port::StateTransaction;

pub(crate) async fn read_item(
    tx: &mut dyn StateTransaction,
    key: &StateKey,
) -> Result<QueueItem> {
    let bytes = tx
        .get(key)
        .await?
        .ok_or_else(|| DomainError::ItemNotFound(key.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn read_item_by_id(
    tx: &mut dyn StateTransaction,
    id: &ItemId,
) -> Result<QueueItem> {
    let key = StateKey::for_item(id);
    let bytes = tx
        .get(&key)
        .await?
        .ok_or_else(|| DomainError::ItemNotFound(id.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn write_item(tx: &mut dyn StateTransaction, item: &QueueItem) -> Result<()> {
    tx.put(&item.key(), &serde_json::to_vec(item)?).await
}

pub(crate) async fn insert_item(tx: &mut dyn StateTransaction, item: &QueueItem) -> Result<()> {
    tx.insert(&item.key(), &serde_json::to_vec(item)?).await
}

pub(crate) async fn read_pointer(
    tx: &mut dyn StateTransaction,
    name: PointerName,
) -> Result<QueuePointer> {
    let key = StateKey::for_pointer(name);
    let bytes = tx
        .get(&key)
        .await?
        .ok_or_else(|| DomainError::ItemNotFound(key.to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn write_pointer(
    tx: &mut dyn StateTransaction,
    name: PointerName,
    target: &StateKey,
) -> Result<()> {
    let pointer = QueuePointer::new(name, target.clone());
    tx.put(&pointer.key(), &serde_json::to_vec(&pointer)?).await
}
