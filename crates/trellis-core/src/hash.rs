//! Digests behind [`crate::ComponentId`].
//!
//! Identities are compared across passes, so the hasher is always built with
//! fixed keys: `ahash` by default, or SipHash with the `std-hash` feature.
//! Digests are stable within one build, not across builds or versions.

use std::hash::{Hash, Hasher};

use crate::element::Key;

#[cfg(not(feature = "std-hash"))]
type IdentityHasher = ahash::AHasher;

#[cfg(feature = "std-hash")]
type IdentityHasher = std::collections::hash_map::DefaultHasher;

fn digest<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = IdentityHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Digest of the identity tree's root.
pub fn root_digest() -> u64 {
    digest("trellis-root")
}

/// Digest of a component called `name`, keyed by `key`, under the identity
/// whose digest is `parent`. An absent key hashes differently from every key.
pub fn component_digest(name: &str, key: Option<&Key>, parent: u64) -> u64 {
    digest(&(parent, name, key))
}

#[cfg(test)]
#[path = "tests/hash_tests.rs"]
mod tests;
