//! Persistent per-instance records that give components stable hook slots.
//!
//! Every component instance owns an [`IdentityNode`] addressed by a
//! [`ComponentId`] derived from its name, optional key and parent identity.
//! The materializer walks this tree in lockstep with the element description:
//! [`IdentityTree::enter`] on the way down, [`IdentityTree::exit`] on the way
//! up. Hooks allocate slots on whichever node is active at the time.

use std::any::Any;
use std::fmt::{self, Write as _};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use slotmap::{new_key_type, SlotMap};

use crate::collections::map::HashMap;
use crate::collections::IdentityMap;
use crate::config::UpdateOrder;
use crate::element::Key;
use crate::hash::{component_digest, root_digest};

new_key_type! {
    /// Handle to a node in an [`IdentityTree`]. Remains valid until the node is swept.
    pub struct NodeKey;
}

/// Deterministic digest of (name, key, parent identity).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    pub fn root() -> Self {
        Self(root_digest())
    }

    /// Two siblings with the same name and no key produce the same id and
    /// therefore share one node. Lists of same-named components need keys.
    pub fn derive(name: &str, key: Option<&Key>, parent: ComponentId) -> Self {
        Self(component_digest(name, key, parent.0))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({self})")
    }
}

static NEXT_CONTEXT_ID: AtomicUsize = AtomicUsize::new(1);

/// Private identity of a context created with [`crate::create_context`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    pub(crate) fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) type SlotUpdate = Box<dyn FnOnce(&mut dyn Any)>;

struct PendingUpdate {
    slot: usize,
    apply: SlotUpdate,
}

pub struct IdentityNode {
    id: ComponentId,
    parent: Option<NodeKey>,
    slots: Vec<Option<Box<dyn Any>>>,
    cursor: usize,
    children: IdentityMap<NodeKey>,
    contexts: HashMap<ContextId, Rc<dyn Any>>,
    queue: Vec<PendingUpdate>,
    visited_pass: u64,
}

impl IdentityNode {
    fn new(id: ComponentId, parent: Option<NodeKey>, pass: u64) -> Self {
        Self {
            id,
            parent,
            slots: Vec::new(),
            cursor: 0,
            children: IdentityMap::new(),
            contexts: HashMap::new(),
            queue: Vec::new(),
            visited_pass: pass,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child(&self, id: ComponentId) -> Option<NodeKey> {
        self.children.get(&id).copied()
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    pub fn queued_updates(&self) -> usize {
        self.queue.len()
    }
}

pub struct IdentityTree {
    nodes: SlotMap<NodeKey, IdentityNode>,
    root: NodeKey,
    current: Option<NodeKey>,
    pass: u64,
}

impl Default for IdentityTree {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(IdentityNode::new(ComponentId::root(), None, 0));
        Self {
            nodes,
            root,
            current: None,
            pass: 0,
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn current(&self) -> Option<NodeKey> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn node(&self, key: NodeKey) -> Option<&IdentityNode> {
        self.nodes.get(key)
    }

    pub fn id_of(&self, key: NodeKey) -> Option<ComponentId> {
        self.nodes.get(key).map(|node| node.id)
    }

    /// Makes the root the active node and starts a new visit mark.
    pub fn begin_pass(&mut self) {
        self.pass += 1;
        let pass = self.pass;
        if let Some(root) = self.nodes.get_mut(self.root) {
            root.cursor = 0;
            root.visited_pass = pass;
        }
        self.current = Some(self.root);
    }

    pub fn end_pass(&mut self) {
        self.current = None;
    }

    fn active(&self) -> NodeKey {
        self.current.expect(
            "no active identity node: hooks and slot access are only valid while a component renders",
        )
    }

    fn active_node_mut(&mut self) -> &mut IdentityNode {
        let key = self.active();
        self.nodes
            .get_mut(key)
            .expect("active identity node was removed from the tree")
    }

    pub fn enter(&mut self, id: ComponentId) -> NodeKey {
        let parent = self.active();
        let pass = self.pass;
        let existing = self.nodes[parent]
            .children
            .get(&id)
            .copied()
            .filter(|child| self.nodes.contains_key(*child));
        let child = match existing {
            Some(child) => child,
            None => {
                let child = self.nodes.insert(IdentityNode::new(id, Some(parent), pass));
                self.nodes[parent].children.insert(id, child);
                child
            }
        };
        let node = &mut self.nodes[child];
        node.cursor = 0;
        node.visited_pass = pass;
        self.current = Some(child);
        child
    }

    /// Moves back to the parent of the active node. No-op at the root.
    pub fn exit(&mut self) {
        let Some(current) = self.current else {
            return;
        };
        if let Some(parent) = self.nodes.get(current).and_then(|node| node.parent) {
            self.current = Some(parent);
        }
    }

    pub fn allocate_slot(&mut self) -> usize {
        let node = self.active_node_mut();
        let index = node.cursor;
        node.cursor += 1;
        if node.slots.len() <= index {
            node.slots.resize_with(index + 1, || None);
        }
        index
    }

    pub fn read_slot(&self, index: usize) -> Option<&dyn Any> {
        let key = self.active();
        self.nodes[key]
            .slots
            .get(index)
            .and_then(|slot| slot.as_deref())
    }

    /// Writes a slot on the active node and hands back the previous contents
    /// so the caller can drop them once the tree is no longer borrowed.
    pub fn write_slot(&mut self, index: usize, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        let node = self.active_node_mut();
        if node.slots.len() <= index {
            node.slots.resize_with(index + 1, || None);
        }
        node.slots[index].replace(value)
    }

    pub fn slot_mut_at(&mut self, key: NodeKey, index: usize) -> Option<&mut dyn Any> {
        self.nodes
            .get_mut(key)?
            .slots
            .get_mut(index)?
            .as_deref_mut()
    }

    /// Returns whatever the write displaced: the previous slot contents, or
    /// `value` itself when `key` no longer exists.
    pub fn replace_slot_at(
        &mut self,
        key: NodeKey,
        index: usize,
        value: Box<dyn Any>,
    ) -> Option<Box<dyn Any>> {
        let Some(node) = self.nodes.get_mut(key) else {
            return Some(value);
        };
        if node.slots.len() <= index {
            node.slots.resize_with(index + 1, || None);
        }
        node.slots[index].replace(value)
    }

    pub fn take_slot_at(&mut self, key: NodeKey, index: usize) -> Option<Box<dyn Any>> {
        self.nodes.get_mut(key)?.slots.get_mut(index)?.take()
    }

    pub fn enqueue_at(&mut self, key: NodeKey, slot: usize, apply: SlotUpdate) -> bool {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.queue.push(PendingUpdate { slot, apply });
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop_update(
        &mut self,
        key: NodeKey,
        order: UpdateOrder,
    ) -> Option<(usize, SlotUpdate)> {
        let node = self.nodes.get_mut(key)?;
        if node.queue.is_empty() {
            return None;
        }
        let update = match order {
            UpdateOrder::Lifo => node.queue.pop()?,
            UpdateOrder::Fifo => node.queue.remove(0),
        };
        Some((update.slot, update.apply))
    }

    /// Pre-order walk from the root.
    pub fn keys(&self) -> Vec<NodeKey> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            order.push(key);
            stack.extend(node.children.values().copied());
        }
        order
    }

    pub fn reset_cursors(&mut self) {
        for (_, node) in self.nodes.iter_mut() {
            node.cursor = 0;
        }
    }

    pub fn set_context(&mut self, id: ContextId, value: Rc<dyn Any>) -> Option<Rc<dyn Any>> {
        self.active_node_mut().contexts.insert(id, value)
    }

    /// Nearest value stored under `id` on the active node or its ancestors.
    pub fn context(&self, id: ContextId) -> Option<Rc<dyn Any>> {
        let start = self.active();
        self.ancestors(start)
            .find_map(|key| self.nodes[key].contexts.get(&id).cloned())
    }

    /// `from` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, from: NodeKey) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.contains_key(from).then_some(from),
        }
    }

    /// Marks every node under `key` as visited in the current pass so the
    /// next sweep keeps it.
    pub fn retain_subtree(&mut self, key: NodeKey) {
        let pass = self.pass;
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(key) {
                node.visited_pass = pass;
                stack.extend(node.children.values().copied());
            }
        }
    }

    /// Detaches every subtree the current pass did not visit and returns the
    /// removed nodes. Dropping them runs effect cleanups, so callers drop the
    /// result only after releasing any borrow of the tree.
    pub fn sweep(&mut self) -> Vec<IdentityNode> {
        let pass = self.pass;
        let mut stale = Vec::new();
        let mut stack = vec![self.root];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            for (&id, &child) in node.children.iter() {
                match self.nodes.get(child) {
                    Some(child_node) if child_node.visited_pass == pass => stack.push(child),
                    Some(_) => stale.push((key, id, child)),
                    None => {}
                }
            }
        }

        let mut removed = Vec::new();
        for (parent, id, child) in stale {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.children.remove(&id);
            }
            let mut pending = vec![child];
            while let Some(key) = pending.pop() {
                if let Some(node) = self.nodes.remove(key) {
                    pending.extend(node.children.values().copied());
                    removed.push(node);
                }
            }
        }
        removed
    }

    pub fn debug_dump(&self) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, self.root, 0);
        output
    }

    fn dump_node(&self, output: &mut String, key: NodeKey, depth: usize) {
        let indent = "  ".repeat(depth);
        let Some(node) = self.nodes.get(key) else {
            let _ = writeln!(output, "{indent}(missing)");
            return;
        };
        let parent = node
            .parent
            .and_then(|parent| self.id_of(parent))
            .map(|id| format!(" -> {id}"))
            .unwrap_or_default();
        let _ = writeln!(
            output,
            "{indent}component {}{parent} slots={} cursor={} children={} contexts={} queued={}",
            node.id,
            node.slots.len(),
            node.cursor,
            node.children.len(),
            node.contexts.len(),
            node.queue.len(),
        );
        let mut children: Vec<_> = node.children.iter().collect();
        children.sort_by_key(|(id, _)| **id);
        for (_, child) in children {
            self.dump_node(output, *child, depth + 1);
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a IdentityTree,
    next: Option<NodeKey>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<NodeKey> {
        let key = self.next?;
        self.next = self.tree.nodes.get(key).and_then(|node| node.parent);
        Some(key)
    }
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
