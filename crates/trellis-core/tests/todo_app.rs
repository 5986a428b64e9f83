use trellis_core::prelude::*;
use trellis_core::{Host, HostId, MemoryHost, Mutation, Root, RuntimeConfig};

#[derive(Clone, Debug, PartialEq)]
struct Todo {
    id: u32,
    title: String,
}

#[derive(Clone, Debug)]
enum Action {
    Add(String),
    Remove(u32),
}

#[derive(Clone, Debug, Default)]
struct Todos {
    next_id: u32,
    items: Vec<Todo>,
}

fn reduce(todos: &Todos, action: Action) -> Todos {
    let mut todos = todos.clone();
    match action {
        Action::Add(title) => {
            todos.next_id += 1;
            todos.items.push(Todo {
                id: todos.next_id,
                title,
            });
        }
        Action::Remove(id) => todos.items.retain(|todo| todo.id != id),
    }
    todos
}

fn todo_app() -> Element {
    let theme = create_context("plain");
    let app_theme = theme.clone();
    let body = Element::component("TodoApp", move |cx| {
        let (todos, dispatch) = use_reducer(cx, reduce, Todos::default);
        let (draft, set_draft) = use_state(cx, String::new);
        let style = use_context(cx, &app_theme);

        let add = {
            let (dispatch, set_draft, draft) = (dispatch.clone(), set_draft.clone(), draft.clone());
            move |_: &Event| {
                if !draft.is_empty() {
                    dispatch.dispatch(Action::Add(draft.clone()));
                    set_draft.set(String::new());
                }
            }
        };
        let rows = todos.items.iter().map(|todo| {
            let (dispatch, id) = (dispatch.clone(), todo.id);
            tag("li")
                .key(todo.id)
                .child(todo.title.as_str())
                .child(
                    tag("button")
                        .attr("id", format!("remove-{id}"))
                        .on("click", move |_| dispatch.dispatch(Action::Remove(id)))
                        .child("x"),
                )
        });

        Ok(tag("section")
            .class(style)
            .child(
                tag("input")
                    .attr("id", "draft")
                    .attr("value", draft.as_str())
                    .on("input", move |event| {
                        set_draft.set(event.value.clone().unwrap_or_default());
                    }),
            )
            .child(tag("button").attr("id", "add").on("click", add).child("add"))
            .child(tag("ul").children(rows))
            .into())
    });
    theme.provider("dark", body)
}

fn mount() -> Root<MemoryHost> {
    let mut host = MemoryHost::new();
    let container = host.create_container("body");
    Root::with_config(
        host,
        container,
        RuntimeConfig::default().with_remount_on_value_change(false),
    )
}

fn by_id(root: &Root<MemoryHost>, id: &str) -> HostId {
    root.with_host(|host| host.find_by_attribute(root.container(), "id", id))
        .unwrap_or_else(|| panic!("missing #{id}"))
}

fn add_todo(root: &Root<MemoryHost>, title: &str) {
    root.dispatch(Event::new("input", by_id(root, "draft")).with_value(title));
    root.dispatch_event(by_id(root, "add"), "click");
}

fn titles(root: &Root<MemoryHost>) -> Vec<String> {
    root.with_host(|host| {
        let list = host.find_all(root.container(), "ul")[0];
        host.children(list)
            .into_iter()
            .map(|item| host.text(host.children(item)[0]).unwrap_or("").to_string())
            .collect()
    })
}

#[test]
fn adds_and_removes_items() {
    let root = mount();
    root.render(todo_app()).unwrap();

    add_todo(&root, "milk");
    add_todo(&root, "eggs");
    add_todo(&root, "bread");
    assert_eq!(titles(&root), ["milk", "eggs", "bread"]);
    let draft = by_id(&root, "draft");
    let value = root.with_host(|host| host.attribute(draft, "value").map(str::to_string));
    assert_eq!(value.as_deref(), Some(""));

    root.dispatch_event(by_id(&root, "remove-2"), "click");
    assert_eq!(titles(&root), ["milk", "bread"]);
    assert!(root.take_error().is_none());
}

#[test]
fn removing_an_item_touches_only_its_row() {
    let root = mount();
    root.render(todo_app()).unwrap();
    add_todo(&root, "a");
    add_todo(&root, "b");
    add_todo(&root, "c");

    let list = root.with_host(|host| host.find_all(root.container(), "ul")[0]);
    let rows = root.with_host(|host| host.children(list));
    root.host_mut().clear_mutations();

    root.dispatch_event(by_id(&root, "remove-1"), "click");
    let removed: Vec<Mutation> = root
        .host()
        .mutations()
        .iter()
        .filter(|mutation| matches!(mutation, Mutation::RemoveChild { .. }))
        .cloned()
        .collect();
    assert_eq!(
        removed,
        [Mutation::RemoveChild {
            parent: list,
            child: rows[0]
        }]
    );
    assert_eq!(root.with_host(|host| host.children(list)), rows[1..]);
}

#[test]
fn empty_draft_is_ignored() {
    let root = mount();
    root.render(todo_app()).unwrap();
    root.dispatch_event(by_id(&root, "add"), "click");
    assert!(titles(&root).is_empty());
}

#[test]
fn provider_value_reaches_the_app() {
    let root = mount();
    root.render(todo_app()).unwrap();
    let section = root.with_host(|host| host.find_all(root.container(), "section")[0]);
    let class_name = root.with_host(|host| host.class_name(section).map(str::to_string));
    assert_eq!(class_name.as_deref(), Some("dark"));
}

#[test]
fn handlers_outlive_unmount_harmlessly() {
    let root = mount();
    root.render(todo_app()).unwrap();
    let draft = by_id(&root, "draft");
    let on_input = root
        .with_host(|host| host.listener(draft, "input"))
        .expect("draft input listener");
    root.unmount().unwrap();

    on_input.call(&Event::new("input", draft).with_value("late"));
    assert!(root.take_error().is_none());
    assert_eq!(root.with_host(|host| host.inner_html(root.container())), "");
}
