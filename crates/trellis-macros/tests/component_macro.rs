use std::convert::Infallible;

use trellis_core::prelude::*;
use trellis_core::{MemoryHost, Root};
use trellis_macros::component;

#[component]
fn Greeting(cx: &Scope, name: String) -> Render {
    let (visits, set_visits) = use_state(cx, || 1);
    Ok(tag("p")
        .attr("id", "greeting")
        .on("click", move |_| set_visits.set(visits + 1))
        .child(format!("hello {name} #{visits}"))
        .into())
}

#[component]
fn Pair(_cx: &Scope, (left, right): (i32, i32)) -> Render {
    Ok(Element::text(left + right))
}

#[component]
async fn Slow(label: &'static str) -> Result<Element, Infallible> {
    Ok(tag("em").child(label).into())
}

fn mount() -> Root<MemoryHost> {
    let mut host = MemoryHost::new();
    let container = host.create_container("root");
    Root::new(host, container)
}

fn html(root: &Root<MemoryHost>) -> String {
    root.with_host(|host| host.inner_html(root.container()))
}

#[test]
fn component_keeps_state_between_renders() {
    let root = mount();
    root.render(Greeting("trellis".to_string())).unwrap();
    assert_eq!(html(&root), r#"<p id="greeting">hello trellis #1</p>"#);

    let target = root
        .with_host(|host| host.find_by_attribute(root.container(), "id", "greeting"))
        .unwrap();
    root.dispatch_event(target, "click");
    assert_eq!(html(&root), r#"<p id="greeting">hello trellis #2</p>"#);
}

#[test]
fn component_is_named_after_its_function() {
    let Element::Component(component) = Greeting(String::new()) else {
        panic!("expected a component element");
    };
    assert_eq!(component.name(), "Greeting");
}

#[test]
fn pattern_props_are_destructured() {
    let root = mount();
    root.render(Pair((2, 3))).unwrap();
    assert_eq!(html(&root), "5");
}

#[test]
fn async_component_renders_after_resolving() {
    let root = mount();
    root.render(Element::suspense("wait", Slow("done"))).unwrap();
    assert_eq!(html(&root), "wait");
    root.run_until_stalled().unwrap();
    assert_eq!(html(&root), "<em>done</em>");
}

#[test]
fn async_component_future_can_be_driven_directly() {
    let Element::AsyncComponent(component) = Slow("direct") else {
        panic!("expected an async component element");
    };
    let element = futures::executor::block_on(component.start()).unwrap();
    assert!(matches!(element, Element::Tag(_)));
}
