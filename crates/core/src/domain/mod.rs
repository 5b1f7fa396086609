// Domain Layer - Pure business logic and entities

pub mod error;
pub mod id;
pub mod item;
pub mod pointer;

// Re-exports
pub use error::DomainError;
pub use id::ItemId;
pub use item::{QueueItem, QueueItemSpec, StateKey, ITEM_KEY_PREFIX};
pub use pointer::{PointerName, QueuePointer};
