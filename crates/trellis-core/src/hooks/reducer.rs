use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::identity::{NodeKey, SlotUpdate};
use crate::runtime::RuntimeHandle;
use crate::scope::Scope;

type Reducer<S, A> = Rc<dyn Fn(&S, A) -> S>;

/// Sends actions to a [`use_reducer`] state.
pub struct Dispatch<S, A> {
    runtime: RuntimeHandle,
    node: NodeKey,
    slot: usize,
    reducer: Reducer<S, A>,
    _marker: PhantomData<fn(A)>,
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            runtime: self.runtime.clone(),
            node: self.node,
            slot: self.slot,
            reducer: Rc::clone(&self.reducer),
            _marker: PhantomData,
        }
    }
}

impl<S: 'static, A: 'static> Dispatch<S, A> {
    /// Queues `reducer(state, action)` for the next pass and requests it.
    pub fn dispatch(&self, action: A) {
        let reducer = Rc::clone(&self.reducer);
        let apply: SlotUpdate = Box::new(move |slot: &mut dyn Any| {
            if let Some(state) = slot.downcast_mut::<S>() {
                *state = reducer(state, action);
            }
        });
        if self.runtime.enqueue(self.node, self.slot, apply) {
            self.runtime.request_render();
        }
    }
}

pub fn use_reducer<S, A>(
    cx: &Scope,
    reducer: impl Fn(&S, A) -> S + 'static,
    init: impl FnOnce() -> S,
) -> (S, Dispatch<S, A>)
where
    S: Clone + 'static,
    A: 'static,
{
    let slot = cx.allocate_slot();
    let state = match cx.slot_value::<S>(slot) {
        Some(state) => state,
        None => {
            let state = init();
            cx.store_slot(slot, state.clone());
            state
        }
    };
    let dispatch = Dispatch {
        runtime: cx.handle(),
        node: cx.node(),
        slot,
        reducer: Rc::new(reducer),
        _marker: PhantomData,
    };
    (state, dispatch)
}
