use super::*;
use crate::identity::ComponentId;

#[test]
fn attribute_values_map_to_host_strings() {
    assert_eq!(AttributeValue::from("a").to_host_string().as_deref(), Some("a"));
    assert_eq!(AttributeValue::from(3).to_host_string().as_deref(), Some("3"));
    assert_eq!(AttributeValue::from(true).to_host_string().as_deref(), Some(""));
    assert_eq!(AttributeValue::from(false).to_host_string(), None);
}

#[test]
fn style_text_splits_declarations() {
    let element = tag("div").style_text("display: flex; gap: 1rem;;  color :red");
    let styles: Vec<_> = element.styles().collect();
    assert_eq!(
        styles,
        vec![("display", "flex"), ("gap", "1rem"), ("color", "red")]
    );
}

#[test]
fn with_key_applies_to_keyed_variants_only() {
    let keyed = Element::from(tag("li")).with_key("a");
    assert_eq!(keyed.key(), Some(&Key::from("a")));

    let component = Element::component("Row", |_| Ok(Element::Empty)).with_key(7);
    assert_eq!(component.key(), Some(&Key::Int(7)));

    let text = Element::from("plain").with_key(1);
    assert_eq!(text.key(), None);
}

#[test]
fn conversions_build_expected_variants() {
    assert!(matches!(Element::from(5), Element::Text(ref text) if &**text == "5"));
    assert!(Element::from(None::<&str>).is_empty());
    let list: Element = (0..3).map(Element::from).collect();
    assert!(matches!(list, Element::List(ref children) if children.len() == 3));
}

#[test]
fn wide_unsigned_keys_do_not_wrap() {
    assert_eq!(Key::from(5usize), Key::Int(5));
    assert_eq!(Key::from(7u64), Key::from(7i32));
    assert_ne!(Key::from(u64::MAX), Key::from(-1i64));
    assert_eq!(Key::from(u64::MAX).to_string(), u64::MAX.to_string());
    assert_ne!(
        ComponentId::derive("Row", Some(&Key::from(u64::MAX)), ComponentId::root()),
        ComponentId::derive("Row", Some(&Key::from(-1i64)), ComponentId::root()),
    );
}

#[test]
fn cloned_elements_share_storage() {
    let element = Element::from(tag("section").child("body"));
    let copy = element.clone();
    match (&element, &copy) {
        (Element::Tag(a), Element::Tag(b)) => assert!(Rc::ptr_eq(a, b)),
        _ => panic!("expected tag elements"),
    }
}
