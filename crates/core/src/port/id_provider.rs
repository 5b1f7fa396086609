// ID Provider Port (for deterministic testing)

use crate::domain::ItemId;
use crate::error::{AppError, Result};
use rand::RngCore;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique, time-ordered item ID
    fn generate(&self) -> Result<ItemId>;
}

/// Production provider: wall-clock timestamp + OS entropy
pub struct UlidProvider;

impl IdProvider for UlidProvider {
    fn generate(&self) -> Result<ItemId> {
        let now = chrono::Utc::now().timestamp_millis();
        let mut entropy = [0u8; 10];
        rand::rngs::OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| AppError::IdGeneration(e.to_string()))?;
        Ok(ItemId::from_parts(now, entropy))
    }
}

/// Counter-backed provider producing sorted, reproducible IDs
///
/// **Note**: This provider should only be used in tests. Production code
/// always injects `UlidProvider`.
pub struct SequentialIdProvider {
    counter: std::sync::atomic::AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self {
            counter: std::sync::atomic::AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate(&self) -> Result<ItemId> {
        let n = self
            .counter
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut entropy = [0u8; 10];
        entropy[2..10].copy_from_slice(&n.to_be_bytes());
        Ok(ItemId::from_parts((n * 1000) as i64, entropy))
    }
}
