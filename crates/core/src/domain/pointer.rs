// Queue Pointer Domain Model

use crate::domain::item::StateKey;
use serde::{Deserialize, Serialize};

/// Name of a singleton boundary pointer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerName {
    Head,
    Tail,
}

impl std::fmt::Display for PointerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointerName::Head => write!(f, "head"),
            PointerName::Tail => write!(f, "tail"),
        }
    }
}

/// Singleton record holding the key of the current boundary item
///
/// Exactly one record exists per name, initialized to EMPTY before any
/// item is pushed. Head and tail are EMPTY if and only if the queue holds
/// zero items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuePointer {
    pub name: PointerName,
    pub target_key: StateKey,
}

impl QueuePointer {
    pub fn new(name: PointerName, target_key: StateKey) -> Self {
        Self { name, target_key }
    }

    /// An initialized-but-empty pointer
    pub fn empty(name: PointerName) -> Self {
        Self::new(name, StateKey::empty())
    }

    /// Record key of this pointer in the state store
    pub fn key(&self) -> StateKey {
        StateKey::for_pointer(self.name)
    }
}
