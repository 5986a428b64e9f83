use super::*;
use crate::element::{Element, Key};
use crate::hooks::{use_resource, use_state};
use std::cell::Cell;
use std::convert::Infallible;

fn component(
    name: &'static str,
    render: impl Fn(&Scope) -> Render + 'static,
) -> ComponentElement {
    match Element::component(name, render) {
        Element::Component(component) => (*component).clone(),
        _ => unreachable!(),
    }
}

#[test]
fn render_request_without_root_is_recorded() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    assert!(!runtime.take_render_request());
    runtime.request_render();
    assert!(runtime.take_render_request());
    assert!(!runtime.take_render_request());
}

#[test]
fn render_request_during_render_is_deferred() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    runtime.set_render_hook(Some(Rc::new(move || counter.set(counter.get() + 1))));

    {
        let _guard = runtime.render_guard();
        assert!(runtime.is_rendering());
        runtime.request_render();
        assert_eq!(calls.get(), 0);
    }
    assert!(!runtime.is_rendering());
    assert!(runtime.take_render_request());

    runtime.request_render();
    assert_eq!(calls.get(), 1);
}

#[test]
fn call_component_sees_initial_state() {
    let runtime = Runtime::detached();
    let greeting = component("Greeting", |cx| {
        let (name, _) = use_state(cx, || "trellis".to_string());
        Ok(Element::text(format!("hello {name}")))
    });
    let rendered = runtime.call_component(&greeting).unwrap();
    assert!(matches!(rendered, Element::Text(ref text) if &**text == "hello trellis"));
    assert!(runtime.tree().current().is_none());
}

#[test]
fn detached_runtime_suspends_then_serves_cached_value() {
    let runtime = Runtime::detached();
    let starts = Rc::new(Cell::new(0));
    let counter = Rc::clone(&starts);
    let reader = component("Reader", move |cx| {
        let counter = Rc::clone(&counter);
        let value: i32 = use_resource(cx, "answer", move || {
            counter.set(counter.get() + 1);
            async { Ok::<_, Infallible>(42) }
        })?;
        Ok(Element::from(value))
    });

    let first = runtime.call_component(&reader);
    let suspended = first.unwrap_err();
    assert_eq!(suspended.boundary, Some(ComponentId::root()));
    assert_eq!(suspended.key, Some(CacheKey::User(Key::from("answer"))));
    assert_eq!(runtime.pending_resources(), 1);

    let poll = runtime.poll_resources();
    assert_eq!(poll.resolved, 1);
    assert!(poll.failure.is_none());
    assert_eq!(runtime.pending_resources(), 0);

    let second = runtime.call_component(&reader).unwrap();
    assert!(matches!(second, Element::Text(ref text) if &**text == "42"));
    assert_eq!(starts.get(), 1);
}

#[test]
fn failed_resource_is_reported_and_stays_pending() {
    let runtime = Runtime::detached();
    let reader = component("Failing", |cx| {
        let value: i32 = use_resource(cx, "broken", || async {
            Err::<i32, _>(std::io::Error::new(std::io::ErrorKind::Other, "offline"))
        })?;
        Ok(Element::from(value))
    });

    assert!(runtime.call_component(&reader).is_err());
    let poll = runtime.poll_resources();
    assert_eq!(poll.resolved, 0);
    let failure = poll.failure.expect("failure reported");
    assert_eq!(failure.to_string(), "resource `broken` failed: offline");

    // The pending marker stays, so the future is not restarted.
    assert!(runtime.call_component(&reader).is_err());
    assert_eq!(runtime.pending_resources(), 0);
}

#[test]
fn handle_outliving_runtime_is_inert() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    assert!(handle.is_alive());
    drop(runtime);
    assert!(!handle.is_alive());
    handle.request_render();
}
