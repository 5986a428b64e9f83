use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::identity::{NodeKey, SlotUpdate};
use crate::runtime::RuntimeHandle;
use crate::scope::Scope;

/// Setter returned by [`use_state`]. Stays valid across renders; calls made
/// after the component was removed are ignored.
pub struct SetState<T> {
    runtime: RuntimeHandle,
    node: NodeKey,
    slot: usize,
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            node: self.node,
            slot: self.slot,
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for SetState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node && self.slot == other.slot
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("node", &self.node)
            .field("slot", &self.slot)
            .finish()
    }
}

impl<T: 'static> SetState<T> {
    /// Replaces the state immediately and requests a render.
    pub fn set(&self, value: T) {
        if self.runtime.write_slot(self.node, self.slot, Box::new(value)) {
            self.runtime.request_render();
        } else {
            log::trace!("ignoring state write to a removed component");
        }
    }

    /// Queues `f` to run against the state at the start of the next pass.
    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        let apply: SlotUpdate = Box::new(move |slot: &mut dyn Any| {
            if let Some(value) = slot.downcast_mut::<T>() {
                *value = f(value);
            }
        });
        if self.runtime.enqueue(self.node, self.slot, apply) {
            self.runtime.request_render();
        } else {
            log::trace!("ignoring state update for a removed component");
        }
    }
}

pub fn use_state<T: Clone + 'static>(cx: &Scope, init: impl FnOnce() -> T) -> (T, SetState<T>) {
    let slot = cx.allocate_slot();
    let value = match cx.slot_value::<T>(slot) {
        Some(value) => value,
        None => {
            let value = init();
            cx.store_slot(slot, value.clone());
            value
        }
    };
    let setter = SetState {
        runtime: cx.handle(),
        node: cx.node(),
        slot,
        _marker: PhantomData,
    };
    (value, setter)
}
