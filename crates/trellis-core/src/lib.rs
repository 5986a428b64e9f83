#![doc = r"Core runtime for Trellis: component identity, hooks, update scheduling and tree reconciliation."]

extern crate self as trellis_core;

pub mod collections;
pub mod config;
pub mod element;
pub mod error;
pub mod hash;
pub mod hooks;
pub mod host;
pub mod identity;
pub mod memory_host;
pub mod platform;
pub mod reconcile;
pub mod runtime;
pub mod vnode;

mod materialize;
mod root;
mod scope;
mod suspense;

pub use config::{RuntimeConfig, UpdateOrder};
pub use element::{
    tag, AsyncComponentElement, AttributeValue, ComponentElement, Element, Key, Render,
    SuspenseElement, TagElement,
};
pub use error::{HostError, RenderError, ResourceError};
pub use hooks::{
    create_context, r#use, use_callback, use_context, use_effect, use_imperative_handle,
    use_memo, use_reducer, use_ref, use_resource, use_state, Cleanup, Context, Dispatch, RefBox,
    Resource, SetState, Usable,
};
pub use host::{Event, EventHandler, Host, HostId};
pub use identity::{ComponentId, ContextId, IdentityTree, NodeKey};
pub use memory_host::{MemoryHost, Mutation};
pub use platform::{DefaultScheduler, RuntimeScheduler};
pub use reconcile::Reconciler;
pub use root::{render_root, Root};
pub use runtime::{Runtime, RuntimeHandle};
pub use scope::Scope;
pub use suspense::{CacheKey, LocalFuture, Suspended};
pub use vnode::{VNode, VNodeKind};

pub mod prelude {
    pub use crate::{
        create_context, r#use, tag, use_callback, use_context, use_effect, use_imperative_handle,
        use_memo, use_reducer, use_ref, use_resource, use_state, Cleanup, Context, Element, Event,
        Key, RefBox, Render, Resource, Scope, SetState, Suspended,
    };
}
