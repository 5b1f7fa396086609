// Attach-Data Operation
//
// Replaces an item's opaque payload outright, discarding whatever was
// attached before. Links and pointers are never touched.

use super::state;
use crate::domain::{ItemId, QueueItem};
use crate::error::Result;
use crate::port::{StateTransaction, TimeProvider};

pub async fn execute(
    tx: &mut dyn StateTransaction,
    time_provider: &dyn TimeProvider,
    id: &ItemId,
    data: Vec<u8>,
) -> Result<QueueItem> {
    let mut item = state::read_item_by_id(tx, id).await?;
    item.extra_data = data;
    item.updated_at = time_provider.now_millis();
    state::write_item(tx, &item).await?;
    Ok(item)
}
