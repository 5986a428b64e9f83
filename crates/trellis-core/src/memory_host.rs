//! In-memory [`Host`] used by tests, benchmarks and the demo binary.

use std::fmt::Write as _;

use askama_escape::{escape, Html};
use indexmap::IndexMap;

use crate::error::HostError;
use crate::host::{EventHandler, Host, HostId};

/// One host call, as recorded by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateElement { id: HostId, tag: String },
    CreateText { id: HostId, text: String },
    AppendChild { parent: HostId, child: HostId },
    RemoveChild { parent: HostId, child: HostId },
    SetAttribute { id: HostId, name: String, value: String },
    RemoveAttribute { id: HostId, name: String },
    AddListener { id: HostId, event: String },
    RemoveListener { id: HostId, event: String },
    SetStyle { id: HostId, property: String, value: String },
    RemoveStyle { id: HostId, property: String },
    SetClassName { id: HostId, class_name: String },
    SetText { id: HostId, text: String },
}

enum MemoryNodeKind {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        style: IndexMap<String, String>,
        class_name: String,
        listeners: IndexMap<String, EventHandler>,
    },
    Text(String),
}

struct MemoryNode {
    kind: MemoryNodeKind,
    parent: Option<HostId>,
    children: Vec<HostId>,
}

#[derive(Default)]
pub struct MemoryHost {
    nodes: Vec<Option<MemoryNode>>,
    log: Vec<Mutation>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached element to render into. Not recorded as a mutation.
    pub fn create_container(&mut self, tag: &str) -> HostId {
        self.insert(MemoryNodeKind::Element {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            style: IndexMap::new(),
            class_name: String::new(),
            listeners: IndexMap::new(),
        })
    }

    fn insert(&mut self, kind: MemoryNodeKind) -> HostId {
        let id = self.nodes.len();
        self.nodes.push(Some(MemoryNode {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    fn node(&self, id: HostId) -> Result<&MemoryNode, HostError> {
        self.nodes
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(HostError::Missing { id })
    }

    fn node_mut(&mut self, id: HostId) -> Result<&mut MemoryNode, HostError> {
        self.nodes
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(HostError::Missing { id })
    }

    fn element_mut(
        &mut self,
        id: HostId,
    ) -> Result<
        (
            &mut IndexMap<String, String>,
            &mut IndexMap<String, String>,
            &mut String,
            &mut IndexMap<String, EventHandler>,
        ),
        HostError,
    > {
        match &mut self.node_mut(id)?.kind {
            MemoryNodeKind::Element {
                attributes,
                style,
                class_name,
                listeners,
                ..
            } => Ok((attributes, style, class_name, listeners)),
            MemoryNodeKind::Text(_) => Err(HostError::NotAnElement { id }),
        }
    }

    /// Drops `id` and everything under it from the arena.
    fn release(&mut self, id: HostId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(id).and_then(Option::take) {
                pending.extend(node.children);
            }
        }
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.log)
    }

    pub fn clear_mutations(&mut self) {
        self.log.clear();
    }

    /// Live nodes, containers included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: HostId) -> bool {
        self.node(id).is_ok()
    }

    pub fn children(&self, id: HostId) -> Vec<HostId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub fn tag(&self, id: HostId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Element { tag, .. } => Some(tag),
            MemoryNodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: HostId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Text(text) => Some(text),
            MemoryNodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, id: HostId, name: &str) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            MemoryNodeKind::Text(_) => None,
        }
    }

    pub fn style_property(&self, id: HostId, property: &str) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Element { style, .. } => style.get(property).map(String::as_str),
            MemoryNodeKind::Text(_) => None,
        }
    }

    pub fn class_name(&self, id: HostId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Element { class_name, .. } if !class_name.is_empty() => {
                Some(class_name)
            }
            _ => None,
        }
    }

    pub fn has_listener(&self, id: HostId, event: &str) -> bool {
        self.listener(id, event).is_some()
    }

    /// Concatenated text of `id` and its descendants.
    pub fn text_content(&self, id: HostId) -> String {
        let mut output = String::new();
        self.collect_text(id, &mut output);
        output
    }

    fn collect_text(&self, id: HostId, output: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            MemoryNodeKind::Text(text) => output.push_str(text),
            MemoryNodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, output);
                }
            }
        }
    }

    /// Descendants of `root` with the given tag, in document order.
    pub fn find_all(&self, root: HostId, tag: &str) -> Vec<HostId> {
        let mut found = Vec::new();
        self.collect_tag(root, tag, &mut found);
        found
    }

    fn collect_tag(&self, id: HostId, tag: &str, found: &mut Vec<HostId>) {
        for child in self.children(id) {
            if self.tag(child) == Some(tag) {
                found.push(child);
            }
            self.collect_tag(child, tag, found);
        }
    }

    /// First descendant of `root` whose attribute `name` equals `value`.
    pub fn find_by_attribute(&self, root: HostId, name: &str, value: &str) -> Option<HostId> {
        for child in self.children(root) {
            if self.attribute(child, name) == Some(value) {
                return Some(child);
            }
            if let Some(found) = self.find_by_attribute(child, name, value) {
                return Some(found);
            }
        }
        None
    }

    /// Markup for the children of `id`.
    pub fn inner_html(&self, id: HostId) -> String {
        let mut output = String::new();
        for child in self.children(id) {
            self.write_html(child, &mut output);
        }
        output
    }

    pub fn outer_html(&self, id: HostId) -> String {
        let mut output = String::new();
        self.write_html(id, &mut output);
        output
    }

    fn write_html(&self, id: HostId, output: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            MemoryNodeKind::Text(text) => {
                let _ = write!(output, "{}", escape(text.as_str(), Html));
            }
            MemoryNodeKind::Element {
                tag,
                attributes,
                style,
                class_name,
                ..
            } => {
                output.push('<');
                output.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(output, " {name}=\"{}\"", escape(value.as_str(), Html));
                }
                if !class_name.is_empty() {
                    let _ = write!(output, " class=\"{}\"", escape(class_name.as_str(), Html));
                }
                if !style.is_empty() {
                    let css: Vec<String> = style
                        .iter()
                        .map(|(property, value)| format!("{property}: {value};"))
                        .collect();
                    let _ = write!(output, " style=\"{}\"", escape(css.join(" ").as_str(), Html));
                }
                output.push('>');
                for child in &node.children {
                    self.write_html(*child, output);
                }
                let _ = write!(output, "</{tag}>");
            }
        }
    }

    pub fn dump_tree(&self, root: HostId) -> String {
        let mut output = String::new();
        self.dump_node(&mut output, root, 0);
        output
    }

    fn dump_node(&self, output: &mut String, id: HostId, depth: usize) {
        let indent = "  ".repeat(depth);
        match self.node(id) {
            Ok(node) => {
                match &node.kind {
                    MemoryNodeKind::Element { tag, .. } => {
                        let _ = writeln!(output, "{indent}[{id}] <{tag}>");
                    }
                    MemoryNodeKind::Text(text) => {
                        let _ = writeln!(output, "{indent}[{id}] {text:?}");
                    }
                }
                for child in &node.children {
                    self.dump_node(output, *child, depth + 1);
                }
            }
            Err(_) => {
                let _ = writeln!(output, "{indent}[{id}] (missing)");
            }
        }
    }
}

impl Host for MemoryHost {
    fn create_element(&mut self, tag: &str) -> HostId {
        let id = self.create_container(tag);
        self.log.push(Mutation::CreateElement {
            id,
            tag: tag.to_string(),
        });
        id
    }

    fn create_text(&mut self, text: &str) -> HostId {
        let id = self.insert(MemoryNodeKind::Text(text.to_string()));
        self.log.push(Mutation::CreateText {
            id,
            text: text.to_string(),
        });
        id
    }

    fn append_child(&mut self, parent: HostId, child: HostId) -> Result<(), HostError> {
        if let MemoryNodeKind::Text(_) = self.node(parent)?.kind {
            return Err(HostError::NotAnElement { id: parent });
        }
        let previous_parent = self.node(child)?.parent;
        if let Some(previous_parent) = previous_parent {
            let siblings = &mut self.node_mut(previous_parent)?.children;
            siblings.retain(|sibling| *sibling != child);
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.log.push(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn remove_child(&mut self, parent: HostId, child: HostId) -> Result<(), HostError> {
        let siblings = &mut self.node_mut(parent)?.children;
        let Some(position) = siblings.iter().position(|sibling| *sibling == child) else {
            return Err(HostError::NotAChild { parent, child });
        };
        siblings.remove(position);
        self.release(child);
        self.log.push(Mutation::RemoveChild { parent, child });
        Ok(())
    }

    fn parent(&self, id: HostId) -> Option<HostId> {
        self.node(id).ok()?.parent
    }

    fn set_attribute(&mut self, id: HostId, name: &str, value: &str) -> Result<(), HostError> {
        let (attributes, ..) = self.element_mut(id)?;
        attributes.insert(name.to_string(), value.to_string());
        self.log.push(Mutation::SetAttribute {
            id,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, id: HostId, name: &str) -> Result<(), HostError> {
        let (attributes, ..) = self.element_mut(id)?;
        attributes.shift_remove(name);
        self.log.push(Mutation::RemoveAttribute {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        id: HostId,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), HostError> {
        let (.., listeners) = self.element_mut(id)?;
        listeners.insert(event.to_string(), handler);
        self.log.push(Mutation::AddListener {
            id,
            event: event.to_string(),
        });
        Ok(())
    }

    fn remove_event_listener(&mut self, id: HostId, event: &str) -> Result<(), HostError> {
        let (.., listeners) = self.element_mut(id)?;
        listeners.shift_remove(event);
        self.log.push(Mutation::RemoveListener {
            id,
            event: event.to_string(),
        });
        Ok(())
    }

    fn set_style(&mut self, id: HostId, property: &str, value: &str) -> Result<(), HostError> {
        let (_, style, ..) = self.element_mut(id)?;
        style.insert(property.to_string(), value.to_string());
        self.log.push(Mutation::SetStyle {
            id,
            property: property.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_style(&mut self, id: HostId, property: &str) -> Result<(), HostError> {
        let (_, style, ..) = self.element_mut(id)?;
        style.shift_remove(property);
        self.log.push(Mutation::RemoveStyle {
            id,
            property: property.to_string(),
        });
        Ok(())
    }

    fn set_class_name(&mut self, id: HostId, class_name: &str) -> Result<(), HostError> {
        let (_, _, current, _) = self.element_mut(id)?;
        *current = class_name.to_string();
        self.log.push(Mutation::SetClassName {
            id,
            class_name: class_name.to_string(),
        });
        Ok(())
    }

    fn set_text(&mut self, id: HostId, text: &str) -> Result<(), HostError> {
        match &mut self.node_mut(id)?.kind {
            MemoryNodeKind::Text(current) => *current = text.to_string(),
            MemoryNodeKind::Element { .. } => return Err(HostError::NotText { id }),
        }
        self.log.push(Mutation::SetText {
            id,
            text: text.to_string(),
        });
        Ok(())
    }

    fn listener(&self, id: HostId, event: &str) -> Option<EventHandler> {
        match &self.node(id).ok()?.kind {
            MemoryNodeKind::Element { listeners, .. } => listeners.get(event).cloned(),
            MemoryNodeKind::Text(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/memory_host_tests.rs"]
mod tests;
