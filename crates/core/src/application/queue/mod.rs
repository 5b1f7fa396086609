// Queue Service - persistent linked-list queue over the state store
//
// Each public method runs inside exactly one store transaction:
// begin, execute, commit on success, roll back on failure. Callers
// composing several operations into one transaction use the operation
// modules directly.

pub mod attach;
pub mod init;
pub mod list;
pub mod pop;
pub mod push;
pub mod reorder;
pub mod select;
mod state;

pub use list::ListStrategy;

use crate::domain::{ItemId, QueueItem, QueueItemSpec};
use crate::error::Result;
use crate::port::{IdProvider, PredicateEvaluator, StateStore, TimeProvider};
use std::sync::Arc;

/// Queue engine configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct QueueConfig {
    /// Strategy behind `list_items`; link traversal stays correct after
    /// reordering and is the default
    pub list_strategy: ListStrategy,
}

/// Queue Service
pub struct QueueService {
    store: Arc<dyn StateStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    evaluator: Arc<dyn PredicateEvaluator>,
    config: QueueConfig,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn StateStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        evaluator: Arc<dyn PredicateEvaluator>,
    ) -> Self {
        Self::with_config(
            store,
            id_provider,
            time_provider,
            evaluator,
            QueueConfig::default(),
        )
    }

    pub fn with_config(
        store: Arc<dyn StateStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        evaluator: Arc<dyn PredicateEvaluator>,
        config: QueueConfig,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
            evaluator,
            config,
        }
    }

    /// Initialize both boundary pointers; required once before any push
    pub async fn init(&self) -> Result<()> {
        let mut tx = self.store.begin().await?;
        match init::execute(tx.as_mut()).await {
            Ok(()) => tx.commit().await,
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Append a new item at the tail
    pub async fn push(&self, spec: QueueItemSpec) -> Result<QueueItem> {
        let mut tx = self.store.begin().await?;
        match push::execute(
            tx.as_mut(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            spec,
        )
        .await
        {
            Ok(item) => {
                tx.commit().await?;
                Ok(item)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Remove and return the head item (FIFO)
    pub async fn pop(&self) -> Result<QueueItem> {
        let mut tx = self.store.begin().await?;
        match pop::execute(tx.as_mut()).await {
            Ok(item) => {
                tx.commit().await?;
                Ok(item)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Replace the opaque payload of the item with `id`
    pub async fn attach_data(&self, id: &str, data: Vec<u8>) -> Result<QueueItem> {
        let id = ItemId::parse(id)?;
        let mut tx = self.store.begin().await?;
        match attach::execute(tx.as_mut(), self.time_provider.as_ref(), &id, data).await {
            Ok(item) => {
                tx.commit().await?;
                Ok(item)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Relocate an item to immediately follow the reference item
    pub async fn move_after(&self, id: &str, after_id: &str) -> Result<QueueItem> {
        let id = ItemId::parse(id)?;
        let after_id = ItemId::parse(after_id)?;
        let mut tx = self.store.begin().await?;
        match reorder::move_after(tx.as_mut(), self.time_provider.as_ref(), &id, &after_id).await {
            Ok(item) => {
                tx.commit().await?;
                Ok(item)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Relocate an item to immediately precede the reference item
    pub async fn move_before(&self, id: &str, before_id: &str) -> Result<QueueItem> {
        let id = ItemId::parse(id)?;
        let before_id = ItemId::parse(before_id)?;
        let mut tx = self.store.begin().await?;
        match reorder::move_before(tx.as_mut(), self.time_provider.as_ref(), &id, &before_id).await
        {
            Ok(item) => {
                tx.commit().await?;
                Ok(item)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// List all items using the configured strategy
    pub async fn list_items(&self) -> Result<Vec<QueueItem>> {
        let mut tx = self.store.begin().await?;
        match list::execute(tx.as_mut(), self.config.list_strategy).await {
            Ok(items) => {
                tx.commit().await?;
                Ok(items)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    /// Filter the canonical (head-to-tail) listing with a predicate
    pub async fn select(&self, expr: &str) -> Result<Vec<QueueItem>> {
        let mut tx = self.store.begin().await?;
        match select::execute(tx.as_mut(), self.evaluator.as_ref(), expr).await {
            Ok(items) => {
                tx.commit().await?;
                Ok(items)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }
}
