//! Map types shared by the identity tree and the suspense cache.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::HashMap;
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use hashbrown::HashMap;
}

use crate::identity::ComponentId;

/// Map keyed by component identity, e.g. child nodes or per-boundary caches.
pub type IdentityMap<V> = map::HashMap<ComponentId, V>;
