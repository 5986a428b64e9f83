use std::any::Any;
use std::rc::Rc;

use crate::element::Element;
use crate::identity::ContextId;
use crate::scope::Scope;

/// A value that flows down the component tree from the nearest
/// [`Context::provider`], falling back to the default given at creation.
pub struct Context<T> {
    id: ContextId,
    default: Rc<T>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            default: Rc::clone(&self.default),
        }
    }
}

pub fn create_context<T: 'static>(default: T) -> Context<T> {
    Context {
        id: ContextId::next(),
        default: Rc::new(default),
    }
}

impl<T: Clone + 'static> Context<T> {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn default_value(&self) -> T {
        (*self.default).clone()
    }

    /// Element that makes `value` visible to every component in `children`.
    /// Providers are components named `ContextProvider`, so sibling
    /// providers need distinct keys.
    pub fn provider(&self, value: T, children: impl Into<Element>) -> Element {
        let id = self.id;
        let value: Rc<dyn Any> = Rc::new(value);
        let children = children.into();
        Element::component("ContextProvider", move |cx| {
            cx.provide(id, Rc::clone(&value));
            Ok(children.clone())
        })
    }
}

/// Reads the nearest provided value. Does not claim a hook slot.
pub fn use_context<T: Clone + 'static>(cx: &Scope, context: &Context<T>) -> T {
    cx.context(context.id)
        .and_then(|value| value.downcast_ref::<T>().cloned())
        .unwrap_or_else(|| context.default_value())
}
