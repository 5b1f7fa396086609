// Item Identifier
//
// 26-character Crockford base32 string: 48-bit millisecond timestamp
// followed by 80 bits of entropy. Lexicographic order equals creation
// order, with entropy breaking ties inside one millisecond.

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Crockford base32 alphabet (no I, L, O, U)
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Encoded identifier length: ceil(128 / 5)
pub const ID_LEN: usize = 26;

/// Unique, time-ordered item identifier
///
/// Immutable for the lifetime of an item. The string form is fixed-width
/// and sorts lexically in creation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Build an identifier from a timestamp and 80 bits of entropy
    pub fn from_parts(timestamp_ms: i64, entropy: [u8; 10]) -> Self {
        let mut value = (timestamp_ms as u128 & 0xFFFF_FFFF_FFFF) << 80;
        for (i, byte) in entropy.iter().enumerate() {
            value |= (*byte as u128) << (72 - i * 8);
        }
        let mut out = [0u8; ID_LEN];
        for (i, slot) in out.iter_mut().enumerate() {
            let shift = (ID_LEN - 1 - i) * 5;
            *slot = ALPHABET[((value >> shift) & 0x1F) as usize];
        }
        // out is pure ASCII from the alphabet table
        Self(String::from_utf8_lossy(&out).into_owned())
    }

    /// Parse and validate an identifier string
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != ID_LEN {
            return Err(DomainError::MalformedId(s.to_string()));
        }
        // 26 * 5 = 130 bits for a 128-bit value: the first character may
        // only carry 3 significant bits
        let bytes = s.as_bytes();
        if bytes[0] > b'7' {
            return Err(DomainError::MalformedId(s.to_string()));
        }
        for b in bytes {
            if !ALPHABET.contains(&b.to_ascii_uppercase()) {
                return Err(DomainError::MalformedId(s.to_string()));
            }
        }
        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Millisecond timestamp encoded in the identifier prefix
    pub fn timestamp_ms(&self) -> i64 {
        let mut value: u128 = 0;
        for b in self.0.bytes() {
            let digit = ALPHABET.iter().position(|a| *a == b).unwrap_or(0) as u128;
            value = (value << 5) | digit;
        }
        ((value >> 80) & 0xFFFF_FFFF_FFFF) as i64
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
