// Queue Initialization
//
// Creates both singleton pointer records as EMPTY. Must run once per
// store before the first push; re-running fails with DuplicateKey so a
// service wanting idempotent startup checks for the records first.

use crate::domain::{PointerName, QueuePointer};
use crate::error::Result;
use crate::port::StateTransaction;

pub async fn execute(tx: &mut dyn StateTransaction) -> Result<()> {
    for name in [PointerName::Head, PointerName::Tail] {
        let pointer = QueuePointer::empty(name);
        tx.insert(&pointer.key(), &serde_json::to_vec(&pointer)?)
            .await?;
    }
    Ok(())
}
