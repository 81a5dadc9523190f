//! Stable hashing for the content-addressed tables.
//!
//! Goals:
//! - Use an explicit hash (not std's randomly seeded SipHash) so table behaviour
//!   is identical across runs and platforms.
//! - Hashing only picks buckets. Ids come from insertion order, never from hash
//!   values, and keys are compared by exact content.

use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hasher};
use twox_hash::XxHash64;

/// 64-bit xxhash with seed=0.
pub type ContentHasher = BuildHasherDefault<XxHash64>;

/// HashMap keyed by exact content, hashed with [`ContentHasher`].
pub type ContentMap<K, V> = HashMap<K, V, ContentHasher>;

pub fn content_map<K, V>() -> ContentMap<K, V> {
    HashMap::with_hasher(ContentHasher::default())
}

/// xxhash64(seed=0) of a byte chunk. Used for diagnostics (stats/fingerprints).
#[inline]
pub fn hash64(bytes: &[u8]) -> u64 {
    let mut h = XxHash64::with_seed(0);
    h.write(bytes);
    h.finish()
}
