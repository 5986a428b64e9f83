use super::*;

#[test]
fn append_and_remove_update_structure() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let div = host.create_element("div");
    let text = host.create_text("hi");
    host.append_child(div, text).unwrap();
    host.append_child(root, div).unwrap();

    assert_eq!(host.parent(text), Some(div));
    assert_eq!(host.inner_html(root), "<div>hi</div>");

    host.remove_child(root, div).unwrap();
    assert!(host.children(root).is_empty());
    assert!(!host.contains(div));
    assert!(!host.contains(text));
    assert_eq!(host.len(), 1);
}

#[test]
fn removing_a_non_child_is_an_error() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let stray = host.create_element("span");
    assert_eq!(
        host.remove_child(root, stray),
        Err(HostError::NotAChild {
            parent: root,
            child: stray
        })
    );
}

#[test]
fn text_nodes_reject_element_operations() {
    let mut host = MemoryHost::new();
    let text = host.create_text("x");
    assert_eq!(
        host.set_attribute(text, "id", "a"),
        Err(HostError::NotAnElement { id: text })
    );
    let div = host.create_element("div");
    assert_eq!(host.set_text(div, "y"), Err(HostError::NotText { id: div }));
}

#[test]
fn serializes_attributes_class_and_style() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let input = host.create_element("input");
    host.set_attribute(input, "value", "a<b").unwrap();
    host.set_class_name(input, "field").unwrap();
    host.set_style(input, "color", "red").unwrap();
    host.append_child(root, input).unwrap();
    assert_eq!(
        host.inner_html(root),
        r#"<input value="a&#60;b" class="field" style="color: red;"></input>"#
    );
}

#[test]
fn serialization_escapes_markup_and_quotes() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let p = host.create_element("p");
    host.set_attribute(p, "title", "it's \"x\"").unwrap();
    let text = host.create_text("Tom & Jerry's <b>");
    host.append_child(p, text).unwrap();
    host.append_child(root, p).unwrap();
    assert_eq!(
        host.inner_html(root),
        "<p title=\"it&#39;s &#34;x&#34;\">Tom &#38; Jerry&#39;s &#60;b&#62;</p>"
    );
}

#[test]
fn records_every_mutation() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let p = host.create_element("p");
    host.add_event_listener(p, "click", EventHandler::new(|_| {}))
        .unwrap();
    host.append_child(root, p).unwrap();
    assert!(host.has_listener(p, "click"));

    let mutations = host.take_mutations();
    assert_eq!(
        mutations,
        vec![
            Mutation::CreateElement {
                id: p,
                tag: "p".into()
            },
            Mutation::AddListener {
                id: p,
                event: "click".into()
            },
            Mutation::AppendChild {
                parent: root,
                child: p
            },
        ]
    );
    assert!(host.mutations().is_empty());
}

#[test]
fn dump_tree_indents_children() {
    let mut host = MemoryHost::new();
    let root = host.create_container("root");
    let text = host.create_text("leaf");
    host.append_child(root, text).unwrap();
    assert_eq!(host.dump_tree(root), "[0] <root>\n  [1] \"leaf\"\n");
}
