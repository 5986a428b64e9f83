use trellis_testing::TestRoot;

use super::*;

#[test]
fn parses_known_paths() {
    let action = FormAction::parse("update.addressData.city", "Lyon").unwrap();
    assert_eq!(action, FormAction::new(Field::City, "Lyon"));
    assert_eq!(action.field.path(), "addressData.city");
}

#[test]
fn rejects_unknown_page() {
    assert_eq!(
        FormAction::parse("update.shippingData.city", "x"),
        Err(FormError::UnknownKey("shippingData".into()))
    );
}

#[test]
fn rejects_field_from_another_page() {
    let err = FormAction::parse("update.basicData.city", "x").unwrap_err();
    assert_eq!(err, FormError::UnknownKey("city".into()));
    assert_eq!(err.to_string(), "invalid key: city");
}

#[test]
fn rejects_paths_past_a_field() {
    assert_eq!(
        FormAction::parse("update.paymentData.cardCVC.digits", "x"),
        Err(FormError::UnknownKey("digits".into()))
    );
}

#[test]
fn rejects_incomplete_paths_and_other_actions() {
    assert_eq!(
        FormAction::parse("update.basicData", "x"),
        Err(FormError::MissingField("basicData"))
    );
    assert_eq!(
        FormAction::parse("reset", "x"),
        Err(FormError::UnknownAction("reset".into()))
    );
}

#[test]
fn reducer_sets_only_the_named_field() {
    let data = FormData::default();
    let next = reduce(&data, FormAction::new(Field::Email, "a@b.c"));
    assert_eq!(next.get(Field::Email), "a@b.c");
    assert_eq!(next.basic.first_name, "");
    assert_eq!(next.address, data.address);
}

#[test]
fn every_field_belongs_to_its_page() {
    for page in Page::ALL {
        for field in page.fields() {
            assert_eq!(field.page(), page);
            let parsed = FormAction::parse(&format!("update.{}", field.path()), "v").unwrap();
            assert_eq!(parsed.field, *field);
        }
    }
}

#[test]
fn wizard_walks_through_pages_and_keeps_data() {
    let root = TestRoot::new();
    root.set_content(form_wizard()).unwrap();
    assert_eq!(root.text_of("title"), "Basic Information");

    root.input("basicData.firstName", "Grace").unwrap();
    assert_eq!(
        root.attribute("basicData.firstName", "value").as_deref(),
        Some("Grace")
    );
    root.click("next").unwrap();
    assert_eq!(root.text_of("title"), "Address Information");
    assert!(root.find("basicData.firstName").is_none());

    root.input("addressData.city", "Paris").unwrap();
    root.click("next").unwrap();
    assert_eq!(root.text_of("title"), "Payment Information");
    assert!(root.find("summary").is_none());

    root.click("submit").unwrap();
    let summary = root.text_of("summary");
    assert!(summary.contains("\"Grace\""), "{summary}");
    assert!(summary.contains("\"Paris\""), "{summary}");

    root.click("start-over").unwrap();
    assert_eq!(root.text_of("title"), "Basic Information");
    assert_eq!(
        root.attribute("basicData.firstName", "value").as_deref(),
        Some("Grace")
    );
}

#[test]
#[should_panic(expected = "inside FormWizard")]
fn pages_need_the_wizard() {
    let root = TestRoot::new();
    let _ = root.set_content(BasicForm(create_context(None)));
}
