use std::rc::Rc;

use crate::element::{AsyncComponentElement, ComponentElement, Element, SuspenseElement};
use crate::identity::ComponentId;
use crate::runtime::Runtime;
use crate::scope::Scope;
use crate::suspense::{CacheKey, Suspended};
use crate::vnode::VNode;

/// Builds the abstract tree for `element`, invoking components and moving
/// through the identity tree in step with them. Returns `Ok(None)` for an
/// empty element.
///
/// Must be called while a pass is active (the identity tree has a current
/// node).
pub(crate) fn materialize(runtime: &Runtime, element: &Element) -> Result<Option<VNode>, Suspended> {
    match element {
        Element::Empty => Ok(None),
        Element::Text(text) => Ok(Some(VNode::text(Rc::clone(text)))),
        Element::List(children) | Element::Fragment(children) => {
            Ok(Some(VNode::fragment(materialize_children(runtime, children)?)))
        }
        Element::Tag(tag) => {
            let children = materialize_children(runtime, &tag.children)?;
            Ok(Some(VNode::tag(Rc::clone(tag), children)))
        }
        Element::Component(component) => materialize_component(runtime, component),
        Element::AsyncComponent(component) => materialize_async_component(runtime, component),
        Element::Suspense(boundary) => materialize_suspense(runtime, boundary),
    }
}

fn materialize_children(runtime: &Runtime, children: &[Element]) -> Result<Vec<VNode>, Suspended> {
    let mut nodes = Vec::with_capacity(children.len());
    for child in children {
        if let Some(node) = materialize(runtime, child)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn materialize_component(
    runtime: &Runtime,
    component: &ComponentElement,
) -> Result<Option<VNode>, Suspended> {
    let id = ComponentId::derive(component.name, component.key.as_ref(), runtime.current_id());
    let node = runtime.enter(id);
    let scope = Scope::new(runtime.clone(), node);
    let result = (component.render)(&scope).and_then(|element| materialize(runtime, &element));
    runtime.exit();

    let mut vnode = result?;
    if let (Some(key), Some(vnode)) = (&component.key, vnode.as_mut()) {
        vnode.key = Some(key.clone());
    }
    Ok(vnode)
}

fn materialize_async_component(
    runtime: &Runtime,
    component: &AsyncComponentElement,
) -> Result<Option<VNode>, Suspended> {
    let id = ComponentId::derive(component.name, component.key.as_ref(), runtime.current_id());
    runtime.enter(id);
    let render = Rc::clone(&component.render);
    let result = runtime
        .read_resource(CacheKey::Component(id), move || render())
        .and_then(|element: Element| materialize(runtime, &element));
    runtime.exit();

    let mut vnode = result?;
    if let (Some(key), Some(vnode)) = (&component.key, vnode.as_mut()) {
        vnode.key = Some(key.clone());
    }
    Ok(vnode)
}

fn materialize_suspense(
    runtime: &Runtime,
    boundary: &SuspenseElement,
) -> Result<Option<VNode>, Suspended> {
    let id = ComponentId::derive("Suspense", boundary.key.as_ref(), runtime.current_id());
    let node = runtime.enter(id);
    runtime.register_boundary(id);

    let effects_mark = runtime.queued_effects();
    let result = match materialize(runtime, &boundary.children) {
        Ok(content) => Ok(content),
        Err(suspended) => {
            log::trace!("boundary {id} showing fallback: {suspended}");
            runtime.discard_effects_since(effects_mark);
            // The suspended content is hidden, not gone.
            runtime.retain_subtree(node);
            materialize(runtime, &boundary.fallback)
        }
    };
    runtime.exit();

    let mut vnode = result?;
    if let (Some(key), Some(vnode)) = (&boundary.key, vnode.as_mut()) {
        vnode.key = Some(key.clone());
    }
    Ok(vnode)
}
