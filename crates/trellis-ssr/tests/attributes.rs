use futures::executor::block_on;
use trellis_core::prelude::*;
use trellis_ssr::render_to_string;

fn render(element: impl Into<Element>) -> String {
    block_on(render_to_string(&element.into())).expect("render")
}

#[test]
fn attribute_names_are_lowercased() {
    assert_eq!(
        render(tag("input").attr("tabIndex", 2).attr("maxLength", 10)),
        r#"<input tabindex="2" maxlength="10"></input>"#
    );
}

#[test]
fn boolean_attributes_are_bare_or_absent() {
    assert_eq!(
        render(tag("button").attr("disabled", true).attr("hidden", false)),
        "<button disabled></button>"
    );
}

#[test]
fn class_name_renders_as_class() {
    assert_eq!(
        render(tag("span").attr("id", "x").class("badge big")),
        r#"<span id="x" class="badge big"></span>"#
    );
}

#[test]
fn styles_render_kebab_cased() {
    assert_eq!(
        render(
            tag("div")
                .style("backgroundColor", "red")
                .style_text("margin-top: 4px; fontSize: 12px")
        ),
        r#"<div style="background-color: red; margin-top: 4px; font-size: 12px;"></div>"#
    );
}

#[test]
fn listeners_and_refs_are_not_rendered() {
    let node_ref = RefBox::new(None);
    assert_eq!(
        render(tag("a").on("click", |_| {}).node_ref(node_ref.clone())),
        "<a></a>"
    );
    assert_eq!(node_ref.get(), None);
}
