//! Abstract tree produced by one render pass and diffed against the previous
//! pass.

use std::fmt;
use std::rc::Rc;

use crate::element::{Key, TagElement};
use crate::host::HostId;

#[derive(Clone)]
pub enum VNodeKind {
    Text(Rc<str>),
    Tag(Rc<TagElement>),
    /// Children are placed directly into the enclosing host node.
    Fragment,
}

#[derive(Clone)]
pub struct VNode {
    pub kind: VNodeKind,
    pub key: Option<Key>,
    pub children: Vec<VNode>,
    /// Host node created for this vnode. Always `None` for fragments.
    pub host: Option<HostId>,
}

impl VNode {
    pub fn text(text: Rc<str>) -> Self {
        Self {
            kind: VNodeKind::Text(text),
            key: None,
            children: Vec::new(),
            host: None,
        }
    }

    pub fn tag(element: Rc<TagElement>, children: Vec<VNode>) -> Self {
        Self {
            key: element.key.clone(),
            kind: VNodeKind::Tag(element),
            children,
            host: None,
        }
    }

    pub fn fragment(children: Vec<VNode>) -> Self {
        Self {
            kind: VNodeKind::Fragment,
            key: None,
            children,
            host: None,
        }
    }

    pub fn tag_element(&self) -> Option<&TagElement> {
        match &self.kind {
            VNodeKind::Tag(element) => Some(element),
            _ => None,
        }
    }

    /// Same variant and, for tags, the same tag name.
    pub fn same_type(&self, other: &VNode) -> bool {
        match (&self.kind, &other.kind) {
            (VNodeKind::Text(_), VNodeKind::Text(_)) => true,
            (VNodeKind::Fragment, VNodeKind::Fragment) => true,
            (VNodeKind::Tag(a), VNodeKind::Tag(b)) => a.tag == b.tag,
            _ => false,
        }
    }

    /// Outermost host nodes owned by this vnode, looking through fragments.
    pub fn host_roots(&self) -> Vec<HostId> {
        let mut roots = Vec::new();
        self.collect_host_roots(&mut roots);
        roots
    }

    fn collect_host_roots(&self, roots: &mut Vec<HostId>) {
        match self.kind {
            VNodeKind::Fragment => {
                for child in &self.children {
                    child.collect_host_roots(roots);
                }
            }
            _ => roots.extend(self.host),
        }
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = match &self.kind {
            VNodeKind::Text(text) => {
                let mut out = f.debug_struct("Text");
                out.field("text", text);
                out
            }
            VNodeKind::Tag(element) => {
                let mut out = f.debug_struct("Tag");
                out.field("tag", &element.tag);
                out
            }
            VNodeKind::Fragment => f.debug_struct("Fragment"),
        };
        if let Some(key) = &self.key {
            out.field("key", key);
        }
        if let Some(host) = self.host {
            out.field("host", &host);
        }
        if !self.children.is_empty() {
            out.field("children", &self.children);
        }
        out.finish()
    }
}
