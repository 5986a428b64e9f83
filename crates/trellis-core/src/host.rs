use std::fmt;
use std::rc::Rc;

use crate::error::HostError;

pub type HostId = usize;

/// Event delivered to listeners by [`crate::Root::dispatch_event`].
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub name: String,
    pub target: HostId,
    /// Current value of the target, for input-like events.
    pub value: Option<String>,
}

impl Event {
    pub fn new(name: &str, target: HostId) -> Self {
        Self {
            name: name.to_string(),
            target,
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Shared event listener. Two handlers are equal only if they are the same
/// allocation, which is how the reconciler decides whether to re-register.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl<F: Fn(&Event) + 'static> From<Rc<F>> for EventHandler {
    fn from(handler: Rc<F>) -> Self {
        Self(handler)
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
    }
}

/// Capability set the reconciler needs from the platform tree.
pub trait Host {
    fn create_element(&mut self, tag: &str) -> HostId;

    fn create_text(&mut self, text: &str) -> HostId;

    fn append_child(&mut self, parent: HostId, child: HostId) -> Result<(), HostError>;

    fn remove_child(&mut self, parent: HostId, child: HostId) -> Result<(), HostError>;

    fn parent(&self, id: HostId) -> Option<HostId>;

    fn set_attribute(&mut self, id: HostId, name: &str, value: &str) -> Result<(), HostError>;

    fn remove_attribute(&mut self, id: HostId, name: &str) -> Result<(), HostError>;

    fn add_event_listener(
        &mut self,
        id: HostId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError>;

    fn remove_event_listener(&mut self, id: HostId, event: &str) -> Result<(), HostError>;

    fn set_style(&mut self, id: HostId, property: &str, value: &str) -> Result<(), HostError>;

    fn remove_style(&mut self, id: HostId, property: &str) -> Result<(), HostError>;

    /// An empty class name clears the class.
    fn set_class_name(&mut self, id: HostId, class_name: &str) -> Result<(), HostError>;

    fn set_text(&mut self, id: HostId, text: &str) -> Result<(), HostError>;

    /// Listener registered for `event` on `id`, if any.
    fn listener(&self, id: HostId, event: &str) -> Option<EventHandler>;
}
