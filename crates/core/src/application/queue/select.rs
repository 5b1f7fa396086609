// Select Operation
//
// Filters the canonical listing with a compiled predicate, preserving
// relative order. Compilation happens before any state read so a bad
// expression fails fast.

use super::list;
use crate::domain::QueueItem;
use crate::error::Result;
use crate::port::{PredicateEvaluator, StateTransaction};

pub async fn execute(
    tx: &mut dyn StateTransaction,
    evaluator: &dyn PredicateEvaluator,
    expr: &str,
) -> Result<Vec<QueueItem>> {
    let predicate = evaluator.compile(expr)?;
    let items = list::link_traversal(tx).await?;
    Ok(items
        .into_iter()
        .filter(|item| predicate.matches(item))
        .collect())
}
