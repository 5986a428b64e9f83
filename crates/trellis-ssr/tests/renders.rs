use std::convert::Infallible;
use std::io;

use futures::executor::block_on;
use trellis_core::prelude::*;
use trellis_macros::component;
use trellis_ssr::{render_to_string, Renderer, SsrError};

fn render(element: impl Into<Element>) -> String {
    block_on(render_to_string(&element.into())).expect("render")
}

#[component]
fn Counter(cx: &Scope, start: i32) -> Render {
    let (count, set_count) = use_state(cx, || start);
    use_effect(cx, (), move || set_count.set(count + 100));
    Ok(tag("button")
        .on("click", |_| {})
        .child(format!("count {count}"))
        .into())
}

#[component]
async fn Article(title: &'static str) -> Result<Element, Infallible> {
    Ok(tag("article").child(tag("h1").child(title)).into())
}

#[test]
fn text_and_fragments_concatenate() {
    assert_eq!(
        render(Element::fragment(["a", "b", "c"])),
        "abc"
    );
    assert_eq!(render(Element::Empty), "");
}

#[test]
fn nested_tags() {
    assert_eq!(
        render(tag("div").attr("id", "app").child(tag("p").child("hi"))),
        r#"<div id="app"><p>hi</p></div>"#
    );
}

#[test]
fn components_render_with_initial_state_and_no_effects() {
    assert_eq!(render(Counter(5)), "<button>count 5</button>");
}

#[test]
fn same_named_components_do_not_share_state() {
    assert_eq!(
        render(Element::fragment([Counter(1), Counter(2)])),
        "<button>count 1</button><button>count 2</button>"
    );
}

#[test]
fn async_components_are_awaited() {
    assert_eq!(
        render(tag("main").child(Article("News"))),
        "<main><article><h1>News</h1></article></main>"
    );
}

#[test]
fn suspended_subtree_renders_fallback() {
    let profile = Element::component("Profile", |cx| {
        let name: String = use_resource(cx, "profile", || async {
            Ok::<_, Infallible>(String::from("Ada"))
        })?;
        Ok(Element::text(name))
    });
    let mut renderer = Renderer::new();
    let html = block_on(renderer.render(&Element::fragment([
        Element::from(tag("header").child("top")),
        Element::suspense(tag("p").child("loading"), profile),
    ])))
    .unwrap();
    assert_eq!(html, "<header>top</header><p>loading</p>");
    assert_eq!(renderer.components_rendered(), 1);
}

#[test]
fn suspension_without_boundary_is_an_error() {
    let lost = Element::component("Lost", |_| Err(Suspended::manual()));
    let err = block_on(render_to_string(&lost)).unwrap_err();
    assert!(matches!(err, SsrError::UnhandledSuspense(_)));
}

#[test]
fn async_component_failure_names_the_component() {
    let broken = Element::async_component("Broken", || async {
        Err::<Element, _>(io::Error::new(io::ErrorKind::Other, "database down"))
    });
    let err = block_on(render_to_string(&broken)).unwrap_err();
    assert_eq!(err.to_string(), "async component Broken failed: database down");
}

#[test]
fn context_providers_are_transparent() {
    let theme = create_context("light");
    let reader = {
        let theme = theme.clone();
        Element::component("Reader", move |cx| Ok(Element::text(use_context(cx, &theme))))
    };
    // Each component renders against its own runtime, so the reader sees the
    // default value.
    assert_eq!(render(theme.provider("dark", reader)), "light");
}
