use futures::executor::block_on;
use trellis_core::prelude::*;
use trellis_ssr::render_to_string;

fn render(element: impl Into<Element>) -> String {
    block_on(render_to_string(&element.into())).expect("render")
}

#[test]
fn escape_text() {
    assert_eq!(
        render(tag("div").child("\"><div>")),
        "<div>&#34;&#62;&#60;div&#62;</div>"
    );
}

#[test]
fn escape_attribute_values() {
    assert_eq!(
        render(tag("input").attr("title", "\"><div>")),
        "<input title=\"&#34;&#62;&#60;div&#62;\"></input>"
    );
}

#[test]
fn escape_style_values() {
    assert_eq!(
        render(tag("div").style("width", "\"><div>")),
        "<div style=\"width: &#34;&#62;&#60;div&#62;;\"></div>"
    );
}
