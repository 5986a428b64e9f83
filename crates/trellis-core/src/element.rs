//! Immutable element descriptions produced by components.
//!
//! Elements are cheap to clone: every variant that owns data keeps it behind an
//! `Rc`, so handing the same subtree to several places never copies it.

use std::error::Error;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::hooks::RefBox;
use crate::host::{Event, EventHandler, HostId};
use crate::scope::Scope;
use crate::suspense::{LocalFuture, Suspended};

/// Result of invoking a component. `Err(Suspended)` unwinds to the nearest
/// suspense boundary.
pub type Render = Result<Element, Suspended>;

pub type ComponentFn = Rc<dyn Fn(&Scope) -> Render>;

pub type AsyncComponentFn = Rc<dyn Fn() -> LocalFuture<Result<Element, Box<dyn Error>>>>;

/// Caller-supplied sibling identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Int(i64),
    Str(Rc<str>),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(value) => write!(f, "{value}"),
            Key::Str(value) => f.write_str(value),
        }
    }
}

macro_rules! key_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(value: $ty) -> Self {
                    Key::Int(value as i64)
                }
            }
        )*
    };
}

key_from_int!(i32, i64, u32);

// Values past `i64::MAX` keep their decimal text so they never wrap onto a
// negative key.
macro_rules! key_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(value: $ty) -> Self {
                    match i64::try_from(value) {
                        Ok(value) => Key::Int(value),
                        Err(_) => Key::Str(Rc::from(value.to_string())),
                    }
                }
            }
        )*
    };
}

key_from_wide_int!(u64, usize);

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(Rc::from(value))
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(Rc::from(value))
    }
}

impl From<Rc<str>> for Key {
    fn from(value: Rc<str>) -> Self {
        Key::Str(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Text(Rc<str>),
    Int(i64),
    Float(f64),
    /// `true` sets the attribute with an empty value, `false` removes it.
    Bool(bool),
}

impl AttributeValue {
    /// String form written to the host, or `None` when the attribute should be
    /// absent.
    pub fn to_host_string(&self) -> Option<String> {
        match self {
            AttributeValue::Text(text) => Some(text.to_string()),
            AttributeValue::Int(value) => Some(value.to_string()),
            AttributeValue::Float(value) => Some(value.to_string()),
            AttributeValue::Bool(true) => Some(String::new()),
            AttributeValue::Bool(false) => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(Rc::from(value))
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(Rc::from(value))
    }
}

impl From<Rc<str>> for AttributeValue {
    fn from(value: Rc<str>) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

macro_rules! attribute_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttributeValue {
                fn from(value: $ty) -> Self {
                    AttributeValue::Int(value as i64)
                }
            }
        )*
    };
}

attribute_from_int!(i32, i64, u32, u64, usize);

/// A host tag with its props and unmaterialized children.
#[derive(Clone)]
pub struct TagElement {
    pub(crate) tag: Rc<str>,
    pub(crate) key: Option<Key>,
    pub(crate) attributes: IndexMap<Rc<str>, AttributeValue>,
    pub(crate) listeners: IndexMap<Rc<str>, EventHandler>,
    pub(crate) style: IndexMap<Rc<str>, Rc<str>>,
    pub(crate) class_name: Option<Rc<str>>,
    pub(crate) node_ref: Option<RefBox<Option<HostId>>>,
    pub(crate) children: Vec<Element>,
}

/// Starts a host tag description.
pub fn tag(name: &str) -> TagElement {
    TagElement {
        tag: Rc::from(name),
        key: None,
        attributes: IndexMap::new(),
        listeners: IndexMap::new(),
        style: IndexMap::new(),
        class_name: None,
        node_ref: None,
        children: Vec::new(),
    }
}

impl TagElement {
    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(Rc::from(name), value.into());
        self
    }

    /// Registers `handler` for `event`. A fresh closure is a new listener on
    /// every render; use [`crate::use_callback`] and [`TagElement::on_handler`]
    /// when the listener should stay registered across passes.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.listeners
            .insert(Rc::from(event), EventHandler::new(handler));
        self
    }

    pub fn on_handler(mut self, event: &str, handler: impl Into<EventHandler>) -> Self {
        self.listeners.insert(Rc::from(event), handler.into());
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(Rc::from(property), Rc::from(value));
        self
    }

    /// Adds every `property: value` pair of a CSS declaration list.
    pub fn style_text(mut self, css: &str) -> Self {
        for declaration in css.split(';') {
            if let Some((property, value)) = declaration.split_once(':') {
                let property = property.trim();
                if !property.is_empty() {
                    self.style
                        .insert(Rc::from(property), Rc::from(value.trim()));
                }
            }
        }
        self
    }

    pub fn class(mut self, class_name: &str) -> Self {
        self.class_name = Some(Rc::from(class_name));
        self
    }

    /// The host node id is written into `node_ref` each time the node is
    /// created or patched.
    pub fn node_ref(mut self, node_ref: RefBox<Option<HostId>>) -> Self {
        self.node_ref = Some(node_ref);
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_ref(), value))
    }

    pub fn styles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.style
            .iter()
            .map(|(name, value)| (name.as_ref(), value.as_ref()))
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn child_elements(&self) -> &[Element] {
        &self.children
    }
}

#[derive(Clone)]
pub struct ComponentElement {
    pub(crate) name: &'static str,
    pub(crate) key: Option<Key>,
    pub(crate) render: ComponentFn,
}

impl ComponentElement {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn render_fn(&self) -> &ComponentFn {
        &self.render
    }
}

/// A component whose output is produced by a future. Rendered by awaiting it
/// on the server; on the client it suspends until the future resolves.
#[derive(Clone)]
pub struct AsyncComponentElement {
    pub(crate) name: &'static str,
    pub(crate) key: Option<Key>,
    pub(crate) render: AsyncComponentFn,
}

impl AsyncComponentElement {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn start(&self) -> LocalFuture<Result<Element, Box<dyn Error>>> {
        (self.render)()
    }
}

#[derive(Clone)]
pub struct SuspenseElement {
    pub(crate) key: Option<Key>,
    pub(crate) fallback: Element,
    pub(crate) children: Element,
}

impl SuspenseElement {
    pub fn fallback(&self) -> &Element {
        &self.fallback
    }

    pub fn content(&self) -> &Element {
        &self.children
    }
}

#[derive(Clone, Default)]
pub enum Element {
    #[default]
    Empty,
    Text(Rc<str>),
    List(Rc<[Element]>),
    Fragment(Rc<[Element]>),
    Tag(Rc<TagElement>),
    Component(Rc<ComponentElement>),
    AsyncComponent(Rc<AsyncComponentElement>),
    Suspense(Rc<SuspenseElement>),
}

impl Element {
    pub fn text(value: impl fmt::Display) -> Self {
        Element::Text(Rc::from(value.to_string()))
    }

    pub fn fragment<I>(children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        Element::Fragment(children.into_iter().map(Into::into).collect())
    }

    pub fn component<F>(name: &'static str, render: F) -> Self
    where
        F: Fn(&Scope) -> Render + 'static,
    {
        Element::Component(Rc::new(ComponentElement {
            name,
            key: None,
            render: Rc::new(render),
        }))
    }

    pub fn async_component<F, Fut, E>(name: &'static str, render: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: std::future::Future<Output = Result<Element, E>> + 'static,
        E: Into<Box<dyn Error>> + 'static,
    {
        let render: AsyncComponentFn = Rc::new(move || {
            let future = render();
            Box::pin(async move { future.await.map_err(Into::into) })
        });
        Element::AsyncComponent(Rc::new(AsyncComponentElement {
            name,
            key: None,
            render,
        }))
    }

    pub fn suspense(fallback: impl Into<Element>, children: impl Into<Element>) -> Self {
        Element::Suspense(Rc::new(SuspenseElement {
            key: None,
            fallback: fallback.into(),
            children: children.into(),
        }))
    }

    /// Sets the sibling key on elements that carry one. Text, lists and
    /// fragments are returned unchanged.
    pub fn with_key(self, key: impl Into<Key>) -> Self {
        let key = Some(key.into());
        match self {
            Element::Tag(element) => {
                let mut element = Rc::unwrap_or_clone(element);
                element.key = key;
                Element::Tag(Rc::new(element))
            }
            Element::Component(element) => {
                let mut element = Rc::unwrap_or_clone(element);
                element.key = key;
                Element::Component(Rc::new(element))
            }
            Element::AsyncComponent(element) => {
                let mut element = Rc::unwrap_or_clone(element);
                element.key = key;
                Element::AsyncComponent(Rc::new(element))
            }
            Element::Suspense(element) => {
                let mut element = Rc::unwrap_or_clone(element);
                element.key = key;
                Element::Suspense(Rc::new(element))
            }
            other => other,
        }
    }

    pub fn key(&self) -> Option<&Key> {
        match self {
            Element::Tag(element) => element.key.as_ref(),
            Element::Component(element) => element.key.as_ref(),
            Element::AsyncComponent(element) => element.key.as_ref(),
            Element::Suspense(element) => element.key.as_ref(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Element::Empty)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Empty => f.write_str("Empty"),
            Element::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Element::List(children) => f.debug_tuple("List").field(children).finish(),
            Element::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            Element::Tag(element) => f
                .debug_struct("Tag")
                .field("tag", &element.tag)
                .field("key", &element.key)
                .field("children", &element.children)
                .finish(),
            Element::Component(element) => f
                .debug_struct("Component")
                .field("name", &element.name)
                .field("key", &element.key)
                .finish(),
            Element::AsyncComponent(element) => f
                .debug_struct("AsyncComponent")
                .field("name", &element.name)
                .field("key", &element.key)
                .finish(),
            Element::Suspense(element) => f
                .debug_struct("Suspense")
                .field("key", &element.key)
                .finish(),
        }
    }
}

impl From<TagElement> for Element {
    fn from(element: TagElement) -> Self {
        Element::Tag(Rc::new(element))
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::Text(Rc::from(text))
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(Rc::from(text))
    }
}

impl From<Rc<str>> for Element {
    fn from(text: Rc<str>) -> Self {
        Element::Text(text)
    }
}

impl From<f64> for Element {
    fn from(value: f64) -> Self {
        Element::text(value)
    }
}

macro_rules! element_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Element {
                fn from(value: $ty) -> Self {
                    Element::text(value)
                }
            }
        )*
    };
}

element_from_int!(i32, i64, u32, u64, usize);

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<Vec<Element>> for Element {
    fn from(children: Vec<Element>) -> Self {
        Element::List(children.into())
    }
}

impl FromIterator<Element> for Element {
    fn from_iter<I: IntoIterator<Item = Element>>(iter: I) -> Self {
        Element::List(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
