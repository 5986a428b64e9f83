use std::any::Any;
use std::fmt;

use crate::runtime::PendingEffect;
use crate::scope::Scope;

/// Teardown returned from an effect. Runs before the effect runs again and
/// when its component is removed.
#[derive(Default)]
pub struct Cleanup(Option<Box<dyn FnOnce()>>);

impl Cleanup {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(f)))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub(crate) fn run(mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

impl From<()> for Cleanup {
    fn from(_: ()) -> Self {
        Cleanup::none()
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0.is_some() {
            "Cleanup(Some)"
        } else {
            "Cleanup(None)"
        })
    }
}

#[derive(Default)]
pub(crate) struct EffectSlot {
    /// Deps of the last effect that actually ran.
    pub(crate) deps: Option<Box<dyn Any>>,
    pub(crate) cleanup: Option<Cleanup>,
}

impl Drop for EffectSlot {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup.run();
        }
    }
}

/// Runs `effect` after the host tree has been patched, on the first render
/// and whenever `deps` differs from the deps of the last run. `()` deps run
/// once.
pub fn use_effect<D, F, C>(cx: &Scope, deps: D, effect: F)
where
    D: PartialEq + 'static,
    F: FnOnce() -> C + 'static,
    C: Into<Cleanup>,
{
    let slot = cx.allocate_slot();
    let unchanged = cx.with_slot(slot, |state: &EffectSlot| {
        state
            .deps
            .as_ref()
            .and_then(|previous| previous.downcast_ref::<D>())
            .is_some_and(|previous| *previous == deps)
    });
    match unchanged {
        Some(true) => return,
        Some(false) => {}
        None => cx.store_slot(slot, EffectSlot::default()),
    }
    cx.runtime().queue_effect(PendingEffect {
        node: cx.node(),
        slot,
        deps: Box::new(deps),
        run: Box::new(move || effect().into()),
    });
}
