// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod memory;
pub mod predicate;
pub mod state_store;
pub mod time_provider;

// Re-exports
pub use id_provider::{IdProvider, SequentialIdProvider, UlidProvider};
pub use memory::MemoryStateStore;
pub use predicate::{FieldExprEvaluator, Predicate, PredicateEvaluator};
pub use state_store::{StateStore, StateTransaction};
pub use time_provider::{FixedTimeProvider, SystemTimeProvider, TimeProvider};
