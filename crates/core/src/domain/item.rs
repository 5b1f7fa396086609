// Queue Item Domain Model

use crate::domain::id::ItemId;
use crate::domain::pointer::PointerName;
use serde::{Deserialize, Serialize};

/// Type prefix for item records in the state store
pub const ITEM_KEY_PREFIX: &str = "item:";

/// Sentinel stored in a link or pointer when there is no neighbor/boundary
const EMPTY_SENTINEL: &str = "*EMPTY*";

/// Opaque address of a record in the state store
///
/// Derived once from an item's identifier and stable for the item's
/// lifetime regardless of link changes. Keys are never reused for a
/// different logical item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// The EMPTY sentinel ("no such neighbor/boundary")
    pub fn empty() -> Self {
        Self(EMPTY_SENTINEL.to_string())
    }

    /// Key of the item record for `id`
    pub fn for_item(id: &ItemId) -> Self {
        Self(format!("{}{}", ITEM_KEY_PREFIX, id))
    }

    /// Key of the singleton pointer record `name`
    pub fn for_pointer(name: PointerName) -> Self {
        Self(format!("pointer:{}", name))
    }

    /// Wrap a raw key as read back from a store scan (adapter use)
    pub fn from_raw(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// True when this key is the EMPTY sentinel
    pub fn is_empty(&self) -> bool {
        self.0 == EMPTY_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed push request: the caller-supplied part of a new item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItemSpec {
    pub origin: String,
    pub destination: String,
    pub quantity: i64,

    #[serde(default)]
    pub extra_data: Option<Vec<u8>>,
}

/// One queued transfer order, stored as an independent record
///
/// Identity (`id` and the derived key) never changes; only the links,
/// `extra_data` and `updated_at` mutate in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: ItemId,

    pub origin: String,
    pub destination: String,
    pub quantity: i64,
    pub extra_data: Vec<u8>,

    /// Key of the previous neighbor, or EMPTY at the head
    pub prev_key: StateKey,
    /// Key of the next neighbor, or EMPTY at the tail
    pub next_key: StateKey,

    pub created_at: i64, // epoch ms, transaction clock
    pub updated_at: i64,
}

impl QueueItem {
    /// Build a fresh, unlinked item from a spec
    pub fn from_spec(id: ItemId, spec: QueueItemSpec, now_millis: i64) -> Self {
        Self {
            id,
            origin: spec.origin,
            destination: spec.destination,
            quantity: spec.quantity,
            extra_data: spec.extra_data.unwrap_or_default(),
            prev_key: StateKey::empty(),
            next_key: StateKey::empty(),
            created_at: now_millis,
            updated_at: now_millis,
        }
    }

    /// Stable record key for this item
    pub fn key(&self) -> StateKey {
        StateKey::for_item(&self.id)
    }

    pub fn has_prev(&self) -> bool {
        !self.prev_key.is_empty()
    }

    pub fn has_next(&self) -> bool {
        !self.next_key.is_empty()
    }
}
