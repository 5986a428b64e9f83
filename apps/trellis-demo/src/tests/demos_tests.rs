use trellis_testing::{run_test_root, TestRoot};

use super::*;

#[test]
fn counter_counts_both_ways() {
    run_test_root(|root| {
        root.set_content(Counter()).unwrap();
        root.click("increment").unwrap();
        root.click("increment").unwrap();
        root.click("decrement").unwrap();
        assert_eq!(root.text_of("count"), "Current count: 1");
    });
}

#[test]
fn title_follows_clicks_and_resets_on_unmount() {
    let title = Rc::new(RefCell::new(DEFAULT_TITLE.to_string()));
    let root = TestRoot::new();
    root.set_content(ClickTitle(Rc::clone(&title))).unwrap();
    assert_eq!(*title.borrow(), "You clicked 0 times");

    root.click("click").unwrap();
    root.click("click").unwrap();
    assert_eq!(*title.borrow(), "You clicked 2 times");

    root.root().unmount().unwrap();
    assert_eq!(*title.borrow(), DEFAULT_TITLE);
}

#[test]
fn keyed_list_removes_and_appends() {
    let root = TestRoot::new();
    root.set_content(KeyedList()).unwrap();
    root.take_mutations();

    root.click("remove-3").unwrap();
    assert!(root.find("remove-3").is_none());
    let removals = root
        .take_mutations()
        .into_iter()
        .filter(|mutation| matches!(mutation, trellis_core::Mutation::RemoveChild { .. }))
        .count();
    assert_eq!(removals, 1);

    root.click("add").unwrap();
    assert!(root.find("remove-6").is_some());
    assert_eq!(
        root.text(),
        "Key ExampleAdd ItemItem 1RemoveItem 2RemoveItem 4RemoveItem 5RemoveItem 6Remove"
    );
}
