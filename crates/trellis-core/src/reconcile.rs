use indexmap::IndexMap;

use crate::config::RuntimeConfig;
use crate::element::{Key, TagElement};
use crate::error::HostError;
use crate::host::{Host, HostId};
use crate::vnode::{VNode, VNodeKind};

/// Applies the difference between two abstract trees to a host.
pub struct Reconciler<'a, H: Host + ?Sized> {
    host: &'a mut H,
    config: RuntimeConfig,
}

impl<'a, H: Host + ?Sized> Reconciler<'a, H> {
    pub fn new(host: &'a mut H, config: RuntimeConfig) -> Self {
        Self { host, config }
    }

    /// Makes the host children of `parent` owned by `previous` match `next`,
    /// recording the host node of every vnode in `next` as it goes.
    pub fn reconcile(
        &mut self,
        parent: HostId,
        previous: Option<VNode>,
        next: Option<&mut VNode>,
    ) -> Result<(), HostError> {
        match (previous, next) {
            (None, None) => Ok(()),
            (Some(previous), None) => self.remove(&previous),
            (None, Some(next)) => self.create(parent, next),
            (Some(previous), Some(next)) => {
                if self.requires_remount(&previous, next) {
                    self.remove(&previous)?;
                    self.create(parent, next)
                } else {
                    self.patch(parent, previous, next)
                }
            }
        }
    }

    fn requires_remount(&self, previous: &VNode, next: &VNode) -> bool {
        if !previous.same_type(next) {
            return true;
        }
        if !self.config.remount_on_value_change {
            return false;
        }
        match (previous.tag_element(), next.tag_element()) {
            // Gaining or losing `value` counts as a change too.
            (Some(old), Some(new)) => old.attribute("value") != new.attribute("value"),
            _ => false,
        }
    }

    fn create(&mut self, parent: HostId, node: &mut VNode) -> Result<(), HostError> {
        let VNode {
            kind,
            children,
            host,
            ..
        } = node;
        match kind {
            VNodeKind::Text(text) => {
                let id = self.host.create_text(text);
                self.host.append_child(parent, id)?;
                *host = Some(id);
            }
            VNodeKind::Tag(element) => {
                log::trace!("creating <{}>", element.tag);
                let id = self.host.create_element(&element.tag);
                self.apply_props(id, None, element)?;
                for child in children.iter_mut() {
                    self.create(id, child)?;
                }
                self.host.append_child(parent, id)?;
                if let Some(node_ref) = &element.node_ref {
                    node_ref.set(Some(id));
                }
                *host = Some(id);
            }
            VNodeKind::Fragment => {
                for child in children.iter_mut() {
                    self.create(parent, child)?;
                }
            }
        }
        Ok(())
    }

    fn remove(&mut self, node: &VNode) -> Result<(), HostError> {
        match &node.kind {
            VNodeKind::Fragment => {
                for child in &node.children {
                    self.remove(child)?;
                }
            }
            VNodeKind::Text(_) | VNodeKind::Tag(_) => {
                let Some(id) = node.host else {
                    return Ok(());
                };
                if let Some(parent) = self.host.parent(id) {
                    log::trace!("removing host node {id}");
                    self.host.remove_child(parent, id)?;
                }
                if let Some(node_ref) = node.tag_element().and_then(|tag| tag.node_ref.as_ref()) {
                    if *node_ref.borrow() == Some(id) {
                        node_ref.set(None);
                    }
                }
            }
        }
        Ok(())
    }

    fn patch(&mut self, parent: HostId, previous: VNode, next: &mut VNode) -> Result<(), HostError> {
        if previous.host.is_none() && !matches!(previous.kind, VNodeKind::Fragment) {
            return self.create(parent, next);
        }
        let VNode {
            kind: previous_kind,
            children: previous_children,
            host: previous_host,
            ..
        } = previous;
        let VNode {
            kind,
            children,
            host,
            ..
        } = next;
        match (previous_kind, kind, previous_host) {
            (VNodeKind::Text(old), VNodeKind::Text(new), Some(id)) => {
                if old != *new {
                    self.host.set_text(id, new)?;
                }
                *host = Some(id);
            }
            (VNodeKind::Tag(old), VNodeKind::Tag(new), Some(id)) => {
                self.apply_props(id, Some(&*old), new)?;
                if let Some(node_ref) = &new.node_ref {
                    node_ref.set(Some(id));
                }
                *host = Some(id);
                self.reconcile_children(id, previous_children, children)?;
            }
            (VNodeKind::Fragment, VNodeKind::Fragment, _) => {
                self.reconcile_children(parent, previous_children, children)?;
            }
            _ => unreachable!("patch called on vnodes of different types"),
        }
        Ok(())
    }

    /// Pairs new children with old ones by key, falling back to the old
    /// unkeyed child at the same index. Paired host nodes keep their
    /// position; nothing is moved.
    fn reconcile_children(
        &mut self,
        parent: HostId,
        previous: Vec<VNode>,
        next: &mut [VNode],
    ) -> Result<(), HostError> {
        let mut keyed: IndexMap<Key, VNode> = IndexMap::new();
        let mut unkeyed: Vec<Option<VNode>> = Vec::new();
        let mut shadowed = Vec::new();
        for child in previous {
            match child.key.clone() {
                Some(key) => {
                    if let Some(duplicate) = keyed.insert(key, child) {
                        shadowed.push(duplicate);
                    }
                }
                None => unkeyed.push(Some(child)),
            }
        }

        for (index, child) in next.iter_mut().enumerate() {
            let matched = child
                .key
                .as_ref()
                .and_then(|key| keyed.shift_remove(key));
            let previous = match matched {
                Some(previous) => Some(previous),
                None => unkeyed.get_mut(index).and_then(Option::take),
            };
            self.reconcile(parent, previous, Some(child))?;
        }

        let unconsumed = keyed
            .into_values()
            .chain(unkeyed.into_iter().flatten())
            .chain(shadowed);
        for child in unconsumed {
            self.remove(&child)?;
        }
        Ok(())
    }

    fn apply_props(
        &mut self,
        id: HostId,
        old: Option<&TagElement>,
        new: &TagElement,
    ) -> Result<(), HostError> {
        if let Some(old) = old {
            for (event, handler) in &old.listeners {
                if new.listeners.get(event) != Some(handler) {
                    self.host.remove_event_listener(id, event)?;
                }
            }
        }
        for (event, handler) in &new.listeners {
            if old.and_then(|old| old.listeners.get(event)) != Some(handler) {
                self.host.add_event_listener(id, event, handler.clone())?;
            }
        }

        if let Some(old) = old {
            for (name, value) in &old.attributes {
                if !new.attributes.contains_key(name) && value.to_host_string().is_some() {
                    self.host.remove_attribute(id, name)?;
                }
            }
        }
        for (name, value) in &new.attributes {
            let previous = old.and_then(|old| old.attributes.get(name));
            if previous == Some(value) {
                continue;
            }
            match value.to_host_string() {
                Some(text) => self.host.set_attribute(id, name, &text)?,
                None => {
                    if previous.is_some_and(|previous| previous.to_host_string().is_some()) {
                        self.host.remove_attribute(id, name)?;
                    }
                }
            }
        }

        if let Some(old) = old {
            for property in old.style.keys() {
                if !new.style.contains_key(property) {
                    self.host.remove_style(id, property)?;
                }
            }
        }
        for (property, value) in &new.style {
            if old.and_then(|old| old.style.get(property)) != Some(value) {
                self.host.set_style(id, property, value)?;
            }
        }

        let old_class = old.and_then(|old| old.class_name.as_deref());
        let new_class = new.class_name.as_deref();
        if old_class != new_class {
            self.host.set_class_name(id, new_class.unwrap_or(""))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
