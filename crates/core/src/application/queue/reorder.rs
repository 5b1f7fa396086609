// Reorder Operations - cut and splice
//
// Both moves share the cut primitive: detach the item (bridging its
// former neighbors and pulling back the boundary pointers), then splice
// it next to the reference item. The reference is re-read after the cut
// because it may have been one of the rewritten neighbors.

use super::state;
use crate::domain::{DomainError, ItemId, PointerName, QueueItem, StateKey};
use crate::error::Result;
use crate::port::{StateTransaction, TimeProvider};
use tracing::debug;

/// Detach an item from the chain without deleting its record
///
/// Head/tail pointers and both neighbors are rewritten in the store; the
/// returned item has its own links reset to EMPTY but is NOT persisted —
/// the caller relinks and writes it.
pub(crate) async fn cut(tx: &mut dyn StateTransaction, id: &ItemId) -> Result<QueueItem> {
    let mut item = state::read_item_by_id(tx, id).await?;
    let item_key = item.key();

    let head = state::read_pointer(tx, PointerName::Head).await?;
    if head.target_key == item_key {
        state::write_pointer(tx, PointerName::Head, &item.next_key).await?;
    }

    let tail = state::read_pointer(tx, PointerName::Tail).await?;
    if tail.target_key == item_key {
        state::write_pointer(tx, PointerName::Tail, &item.prev_key).await?;
    }

    if item.has_prev() {
        let mut prev = state::read_item(tx, &item.prev_key).await?;
        prev.next_key = item.next_key.clone();
        state::write_item(tx, &prev).await?;
    }

    if item.has_next() {
        let mut next = state::read_item(tx, &item.next_key).await?;
        next.prev_key = item.prev_key.clone();
        state::write_item(tx, &next).await?;
    }

    item.prev_key = StateKey::empty();
    item.next_key = StateKey::empty();
    Ok(item)
}

/// Relocate `id` so that it immediately follows `after_id`
pub async fn move_after(
    tx: &mut dyn StateTransaction,
    time_provider: &dyn TimeProvider,
    id: &ItemId,
    after_id: &ItemId,
) -> Result<QueueItem> {
    if id == after_id {
        return Err(DomainError::SelfReference(id.to_string()).into());
    }

    let mut item = cut(tx, id).await?;

    // the cut may have rewritten the reference item's links
    let mut after = state::read_item_by_id(tx, after_id).await?;

    if after.has_next() {
        let mut next = state::read_item(tx, &after.next_key).await?;
        next.prev_key = item.key();
        state::write_item(tx, &next).await?;
        item.next_key = next.key();
    } else {
        // reference was the tail; the moved item becomes the new tail
        item.next_key = StateKey::empty();
        state::write_pointer(tx, PointerName::Tail, &item.key()).await?;
    }

    after.next_key = item.key();
    item.prev_key = after.key();
    item.updated_at = time_provider.now_millis();

    state::write_item(tx, &item).await?;
    state::write_item(tx, &after).await?;

    debug!(id = %item.id, after = %after.id, "moved item after reference");
    Ok(item)
}

/// Relocate `id` so that it immediately precedes `before_id`
pub async fn move_before(
    tx: &mut dyn StateTransaction,
    time_provider: &dyn TimeProvider,
    id: &ItemId,
    before_id: &ItemId,
) -> Result<QueueItem> {
    if id == before_id {
        return Err(DomainError::SelfReference(id.to_string()).into());
    }

    let mut item = cut(tx, id).await?;

    let mut before = state::read_item_by_id(tx, before_id).await?;

    if before.has_prev() {
        let mut prev = state::read_item(tx, &before.prev_key).await?;
        prev.next_key = item.key();
        state::write_item(tx, &prev).await?;
        item.prev_key = prev.key();
    } else {
        // reference was the head; the moved item becomes the new head
        item.prev_key = StateKey::empty();
        state::write_pointer(tx, PointerName::Head, &item.key()).await?;
    }

    before.prev_key = item.key();
    item.next_key = before.key();
    item.updated_at = time_provider.now_millis();

    state::write_item(tx, &item).await?;
    state::write_item(tx, &before).await?;

    debug!(id = %item.id, before = %before.id, "moved item before reference");
    Ok(item)
}
