// Listing Strategies
//
// Link traversal is the canonical, order-authoritative listing; the two
// scan-based strategies exist for inspection and only agree with it
// while no reorder has ever run.

use super::state;
use crate::domain::{PointerName, QueueItem, ITEM_KEY_PREFIX};
use crate::error::Result;
use crate::port::StateTransaction;

/// Strategy used by the listing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStrategy {
    /// Walk next-links from the head (true current order)
    #[default]
    LinkTraversal,
    /// Prefix scan sorted in memory by identifier (creation order)
    IdentitySorted,
    /// Prefix scan in whatever order the store yields
    AsStored,
}

pub async fn execute(
    tx: &mut dyn StateTransaction,
    strategy: ListStrategy,
) -> Result<Vec<QueueItem>> {
    match strategy {
        ListStrategy::LinkTraversal => link_traversal(tx).await,
        ListStrategy::IdentitySorted => {
            let mut items = scan(tx).await?;
            items.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(items)
        }
        ListStrategy::AsStored => scan(tx).await,
    }
}

/// Canonical head-to-tail walk along next-links
pub(crate) async fn link_traversal(tx: &mut dyn StateTransaction) -> Result<Vec<QueueItem>> {
    let mut items = Vec::new();
    let head = state::read_pointer(tx, PointerName::Head).await?;

    let mut cursor = head.target_key;
    while !cursor.is_empty() {
        let item = state::read_item(tx, &cursor).await?;
        cursor = item.next_key.clone();
        items.push(item);
    }
    Ok(items)
}

async fn scan(tx: &mut dyn StateTransaction) -> Result<Vec<QueueItem>> {
    let records = tx.list_prefix(ITEM_KEY_PREFIX).await?;
    records
        .into_iter()
        .map(|(_, bytes)| Ok(serde_json::from_slice(&bytes)?))
        .collect()
}
