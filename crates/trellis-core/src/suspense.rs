//! Suspension as a value.
//!
//! A component that reads a resource which is not ready yet returns
//! `Err(Suspended)` and lets `?` carry it up to the nearest
//! [`crate::Element::suspense`] boundary, which renders its fallback instead.

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::collections::map::HashMap;
use crate::collections::IdentityMap;
use crate::element::Key;
use crate::identity::ComponentId;

pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T>>>;

pub(crate) type ResourceFuture = LocalFuture<Result<Rc<dyn Any>, Box<dyn Error>>>;

/// Entry key inside one boundary's cache.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Key passed to [`crate::use_resource`].
    User(Key),
    /// Output of an async component, keyed by its own identity.
    Component(ComponentId),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::User(key) => write!(f, "resource `{key}`"),
            CacheKey::Component(id) => write!(f, "component {id}"),
        }
    }
}

/// Marker that a resource under `boundary` is still pending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suspended {
    pub boundary: Option<ComponentId>,
    pub key: Option<CacheKey>,
}

impl Suspended {
    /// Suspension raised by hand, not tied to a cache entry.
    pub fn manual() -> Self {
        Self {
            boundary: None,
            key: None,
        }
    }
}

impl fmt::Display for Suspended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.key, &self.boundary) {
            (Some(key), Some(boundary)) => {
                write!(f, "waiting on {key} in boundary {boundary}")
            }
            (Some(key), None) => write!(f, "waiting on {key}"),
            _ => f.write_str("suspended"),
        }
    }
}

impl Error for Suspended {}

#[derive(Clone)]
pub(crate) enum CacheEntry {
    Pending,
    Resolved(Rc<dyn Any>),
}

/// Per-boundary resource cache. Resolved entries never revert to pending.
#[derive(Default)]
pub(crate) struct SuspenseCache {
    boundaries: IdentityMap<HashMap<CacheKey, CacheEntry>>,
}

impl SuspenseCache {
    pub(crate) fn register(&mut self, boundary: ComponentId) {
        self.boundaries.entry(boundary).or_default();
    }

    pub(crate) fn is_boundary(&self, id: ComponentId) -> bool {
        self.boundaries.contains_key(&id)
    }

    pub(crate) fn get(&self, boundary: ComponentId, key: &CacheKey) -> Option<CacheEntry> {
        self.boundaries.get(&boundary)?.get(key).cloned()
    }

    pub(crate) fn mark_pending(&mut self, boundary: ComponentId, key: CacheKey) {
        self.boundaries
            .entry(boundary)
            .or_default()
            .insert(key, CacheEntry::Pending);
    }

    pub(crate) fn resolve(&mut self, boundary: ComponentId, key: CacheKey, value: Rc<dyn Any>) {
        self.boundaries
            .entry(boundary)
            .or_default()
            .insert(key, CacheEntry::Resolved(value));
    }

    pub(crate) fn len(&self) -> usize {
        self.boundaries.values().map(HashMap::len).sum()
    }
}

/// A resource future owned by the runtime until it completes.
pub(crate) struct ResourceTask {
    pub(crate) boundary: ComponentId,
    pub(crate) key: CacheKey,
    pub(crate) future: ResourceFuture,
}
