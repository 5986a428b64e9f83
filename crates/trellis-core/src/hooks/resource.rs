use std::error::Error;
use std::future::Future;

use crate::element::Key;
use crate::hooks::{use_context, Context};
use crate::scope::Scope;
use crate::suspense::{CacheKey, Suspended};

/// Reads an asynchronous value through the nearest suspense boundary.
///
/// The first read starts `make_future` and returns `Err(Suspended)`; later
/// reads return the same error until [`crate::Root::run_until_stalled`] sees
/// the future complete, after which every read returns the cached value.
/// `make_future` is never called again for a key the boundary already knows.
///
/// # Panics
///
/// Panics if no [`crate::Element::suspense`] boundary encloses the caller.
pub fn use_resource<T, Fut, E>(
    cx: &Scope,
    key: impl Into<Key>,
    make_future: impl FnOnce() -> Fut,
) -> Result<T, Suspended>
where
    T: Clone + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
    E: Into<Box<dyn Error>> + 'static,
{
    if cx.runtime().current_node() != Some(cx.node()) {
        panic!("use_resource called outside the render of its own component");
    }
    cx.runtime()
        .read_resource(CacheKey::User(key.into()), make_future)
}

/// Keyed future factory accepted by [`r#use`].
pub struct Resource<F> {
    key: Key,
    start: F,
}

impl<F> Resource<F> {
    pub fn new(key: impl Into<Key>, start: F) -> Self {
        Self {
            key: key.into(),
            start,
        }
    }
}

/// Something [`r#use`] can read: a [`Resource`] or a `&Context`.
pub trait Usable {
    type Output;

    fn read(self, cx: &Scope) -> Result<Self::Output, Suspended>;
}

impl<F, Fut, T, E> Usable for Resource<F>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>> + 'static,
    T: Clone + 'static,
    E: Into<Box<dyn Error>> + 'static,
{
    type Output = T;

    fn read(self, cx: &Scope) -> Result<T, Suspended> {
        use_resource(cx, self.key, self.start)
    }
}

impl<T: Clone + 'static> Usable for &Context<T> {
    type Output = T;

    fn read(self, cx: &Scope) -> Result<T, Suspended> {
        Ok(use_context(cx, self))
    }
}

pub fn r#use<U: Usable>(cx: &Scope, source: U) -> Result<U::Output, Suspended> {
    source.read(cx)
}
