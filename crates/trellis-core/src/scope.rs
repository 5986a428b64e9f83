use std::any::Any;
use std::rc::Rc;

use crate::identity::{ComponentId, ContextId, NodeKey};
use crate::runtime::{Runtime, RuntimeHandle};

/// Handle given to a component while it renders. Hooks take it as their
/// first argument and act on the component's own identity node.
pub struct Scope {
    runtime: Runtime,
    node: NodeKey,
}

impl Scope {
    pub(crate) fn new(runtime: Runtime, node: NodeKey) -> Self {
        Self { runtime, node }
    }

    pub fn id(&self) -> ComponentId {
        self.runtime
            .with_tree(|tree| tree.id_of(self.node))
            .expect("scope outlived its identity node")
    }

    pub fn node(&self) -> NodeKey {
        self.node
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Hooks mutate whichever node is active, so calling one with a scope
    /// that is not currently rendering would corrupt another component.
    fn assert_active(&self) {
        let current = self.runtime.current_node();
        if current != Some(self.node) {
            panic!(
                "hook called outside the render of its own component (scope node {:?}, active node {:?})",
                self.node, current
            );
        }
    }

    pub(crate) fn allocate_slot(&self) -> usize {
        self.assert_active();
        self.runtime.with_tree_mut(|tree| tree.allocate_slot())
    }

    /// Runs `f` against the slot value while the identity tree is borrowed,
    /// so `f` must not call back into the runtime. A slot holding another
    /// type reads as empty and gets reinitialized by the caller.
    pub(crate) fn with_slot<T: 'static, R>(
        &self,
        index: usize,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        self.runtime.with_tree(|tree| {
            let value = tree.read_slot(index)?;
            match value.downcast_ref::<T>() {
                Some(value) => Some(f(value)),
                None => {
                    log::warn!(
                        "slot {index} of component {} holds an unexpected type; reinitializing \
                         (are hooks called in a different order than the previous render?)",
                        tree.id_of(self.node).unwrap_or_else(ComponentId::root),
                    );
                    None
                }
            }
        })
    }

    pub(crate) fn with_slot_mut<T: 'static, R>(
        &self,
        index: usize,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        let node = self.node;
        let has_slot = self.with_slot(index, |_: &T| ()).is_some();
        if !has_slot {
            return None;
        }
        self.runtime.with_tree_mut(|tree| {
            tree.slot_mut_at(node, index)
                .and_then(|value| value.downcast_mut::<T>())
                .map(f)
        })
    }

    pub(crate) fn slot_value<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        self.with_slot(index, T::clone)
    }

    pub(crate) fn store_slot<T: 'static>(&self, index: usize, value: T) {
        let displaced = self
            .runtime
            .with_tree_mut(|tree| tree.write_slot(index, Box::new(value)));
        drop(displaced);
    }

    pub(crate) fn provide(&self, id: ContextId, value: Rc<dyn Any>) {
        self.assert_active();
        let displaced = self
            .runtime
            .with_tree_mut(|tree| tree.set_context(id, value));
        drop(displaced);
    }

    pub(crate) fn context(&self, id: ContextId) -> Option<Rc<dyn Any>> {
        self.assert_active();
        self.runtime.with_tree(|tree| tree.context(id))
    }
}
