use super::*;

#[test]
fn digests_are_stable_and_distinguish_inputs() {
    let root = root_digest();
    assert_eq!(root, root_digest());
    let keyed = component_digest("Row", Some(&Key::Int(1)), root);
    assert_eq!(keyed, component_digest("Row", Some(&Key::Int(1)), root));
    assert_ne!(keyed, component_digest("Row", None, root));
    assert_ne!(keyed, component_digest("Row", Some(&Key::Int(1)), keyed));
    assert_ne!(keyed, component_digest("Cell", Some(&Key::Int(1)), root));
}
