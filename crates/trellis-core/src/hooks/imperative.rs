use crate::hooks::RefBox;
use crate::scope::Scope;

/// Stores `create()` in `handle` on the first render and whenever `deps`
/// changes, so a parent holding the same box can call into this component.
pub fn use_imperative_handle<H, D>(
    cx: &Scope,
    handle: &RefBox<Option<H>>,
    deps: D,
    create: impl FnOnce() -> H,
) where
    H: 'static,
    D: PartialEq + 'static,
{
    let slot = cx.allocate_slot();
    let unchanged = cx
        .with_slot(slot, |previous: &D| *previous == deps)
        .unwrap_or(false);
    if unchanged {
        return;
    }
    handle.set(Some(create()));
    cx.store_slot(slot, deps);
}
