use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::prelude::*;
use trellis_macros::component;

pub const DEFAULT_TITLE: &str = "Trellis App";

#[component]
pub fn Counter(cx: &Scope) -> Render {
    let (count, set_count) = use_state(cx, || 0i32);
    let decrement = set_count.clone();

    Ok(tag("div")
        .child(tag("h1").child("useState Example"))
        .child(
            tag("div")
                .style("padding", "20px")
                .style("display", "flex")
                .style("flex-direction", "column")
                .child(tag("p").attr("id", "count").child(format!("Current count: {count}")))
                .child(
                    tag("button")
                        .attr("id", "increment")
                        .attr("type", "button")
                        .on("click", move |_| set_count.update(|prev| prev + 1))
                        .child("Increment"),
                )
                .child(
                    tag("button")
                        .attr("id", "decrement")
                        .attr("type", "button")
                        .on("click", move |_| decrement.update(|prev| prev - 1))
                        .child("Decrement"),
                ),
        )
        .into())
}

/// Keeps `title` in sync with the click count while mounted.
#[component]
pub fn ClickTitle(cx: &Scope, title: Rc<RefCell<String>>) -> Render {
    let (count, set_count) = use_state(cx, || 0u32);
    use_effect(cx, count, move || {
        log::info!("updating title for {count} clicks");
        *title.borrow_mut() = format!("You clicked {count} times");
        Cleanup::new(move || {
            log::info!("resetting title");
            *title.borrow_mut() = DEFAULT_TITLE.to_string();
        })
    });

    Ok(tag("div")
        .child(tag("h1").child("useEffect Example"))
        .child(
            tag("button")
                .attr("id", "click")
                .attr("type", "button")
                .on("click", move |_| set_count.set(count + 1))
                .child(format!("Click {count} times")),
        )
        .into())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub id: u32,
    pub text: String,
}

fn initial_items() -> Vec<Item> {
    (1..=5)
        .map(|id| Item {
            id,
            text: format!("Item {id}"),
        })
        .collect()
}

#[component]
pub fn KeyedList(cx: &Scope) -> Render {
    let (items, set_items) = use_state(cx, initial_items);
    let add = set_items.clone();

    let rows = items.iter().map(|item| {
        let (set_items, id) = (set_items.clone(), item.id);
        tag("li")
            .key(item.id)
            .style("display", "flex")
            .style("justify-content", "space-between")
            .child(item.text.as_str())
            .child(
                tag("button")
                    .attr("id", format!("remove-{id}"))
                    .attr("type", "button")
                    .style("background", "red")
                    .style("color", "white")
                    .on("click", move |_| {
                        set_items.update(move |items| {
                            items.iter().filter(|item| item.id != id).cloned().collect()
                        })
                    })
                    .child("Remove"),
            )
    });

    Ok(tag("div")
        .child(tag("h1").child("Key Example"))
        .child(
            tag("button")
                .attr("id", "add")
                .attr("type", "button")
                .on("click", move |_| {
                    add.update(|items| {
                        let id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
                        let mut items = items.clone();
                        items.push(Item {
                            id,
                            text: format!("Item {id}"),
                        });
                        items
                    })
                })
                .child("Add Item"),
        )
        .child(
            tag("ul")
                .style("max-width", "300px")
                .style("list-style-type", "none")
                .children(rows),
        )
        .into())
}

#[cfg(test)]
#[path = "tests/demos_tests.rs"]
mod tests;
