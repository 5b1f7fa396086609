// Pop Operation
//
// Removes and returns the head item (FIFO). The successor loses its
// prev-link and becomes the new head; when the queue drains, both
// pointers reset to EMPTY.

use super::state;
use crate::domain::{DomainError, PointerName, QueueItem, StateKey};
use crate::error::Result;
use crate::port::StateTransaction;
use tracing::debug;

pub async fn execute(tx: &mut dyn StateTransaction) -> Result<QueueItem> {
    let head = state::read_pointer(tx, PointerName::Head).await?;
    if head.target_key.is_empty() {
        return Err(DomainError::EmptyQueue.into());
    }

    let head_item = state::read_item(tx, &head.target_key).await?;

    if head_item.has_next() {
        let mut next = state::read_item(tx, &head_item.next_key).await?;
        next.prev_key = StateKey::empty();
        state::write_item(tx, &next).await?;
        state::write_pointer(tx, PointerName::Head, &head_item.next_key).await?;
    } else {
        // popped item was also the tail
        state::write_pointer(tx, PointerName::Head, &StateKey::empty()).await?;
        state::write_pointer(tx, PointerName::Tail, &StateKey::empty()).await?;
    }

    tx.delete(&head_item.key()).await?;

    debug!(id = %head_item.id, "popped head item");
    Ok(head_item)
}
