// Push Operation
//
// Appends a new item at the tail. The former tail (if any) gets its
// next-link rewritten, the tail pointer always moves, and the head
// pointer is set only when the queue was empty.

use super::state;
use crate::domain::{PointerName, QueueItem, QueueItemSpec};
use crate::error::Result;
use crate::port::{IdProvider, StateTransaction, TimeProvider};
use tracing::debug;

pub async fn execute(
    tx: &mut dyn StateTransaction,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    spec: QueueItemSpec,
) -> Result<QueueItem> {
    let id = id_provider.generate()?;
    let now = time_provider.now_millis();
    let mut item = QueueItem::from_spec(id, spec, now);

    let tail = state::read_pointer(tx, PointerName::Tail).await?;
    if !tail.target_key.is_empty() {
        let mut tail_item = state::read_item(tx, &tail.target_key).await?;
        tail_item.next_key = item.key();
        item.prev_key = tail_item.key();
        state::write_item(tx, &tail_item).await?;
    }

    state::write_pointer(tx, PointerName::Tail, &item.key()).await?;

    let head = state::read_pointer(tx, PointerName::Head).await?;
    if head.target_key.is_empty() {
        state::write_pointer(tx, PointerName::Head, &item.key()).await?;
    }

    // insert fails on an existing key; ids are fresh so this only guards
    // against a corrupted store
    state::insert_item(tx, &item).await?;

    debug!(id = %item.id, "pushed item at tail");
    Ok(item)
}
