use std::rc::Rc;

use crate::scope::Scope;

struct MemoSlot<D, T> {
    deps: D,
    value: T,
}

/// Recomputes only when `deps` changes.
pub fn use_memo<T, D>(cx: &Scope, deps: D, compute: impl FnOnce() -> T) -> T
where
    T: Clone + 'static,
    D: PartialEq + 'static,
{
    let slot = cx.allocate_slot();
    let cached = cx
        .with_slot(slot, |memo: &MemoSlot<D, T>| {
            (memo.deps == deps).then(|| memo.value.clone())
        })
        .flatten();
    if let Some(value) = cached {
        return value;
    }
    let value = compute();
    cx.store_slot(
        slot,
        MemoSlot {
            deps,
            value: value.clone(),
        },
    );
    value
}

/// Returns the same `Rc` for as long as `deps` is unchanged, so the callback
/// can be compared by identity (event listeners, effect deps).
pub fn use_callback<F, D>(cx: &Scope, deps: D, callback: F) -> Rc<F>
where
    F: 'static,
    D: PartialEq + 'static,
{
    use_memo(cx, deps, move || Rc::new(callback))
}
