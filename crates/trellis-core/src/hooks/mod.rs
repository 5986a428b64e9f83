//! Hook primitives. Each hook claims one slot on the calling component's
//! identity node, so a component must call its hooks in the same order on
//! every render.

mod context;
pub(crate) mod effect;
mod imperative;
mod memo;
mod reducer;
mod reference;
mod resource;
mod state;

pub use context::{create_context, use_context, Context};
pub use effect::{use_effect, Cleanup};
pub use imperative::use_imperative_handle;
pub use memo::{use_callback, use_memo};
pub use reducer::{use_reducer, Dispatch};
pub use reference::{use_ref, RefBox};
pub use resource::{r#use, use_resource, Resource, Usable};
pub use state::{use_state, SetState};
