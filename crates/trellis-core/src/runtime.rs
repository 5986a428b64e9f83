use std::any::Any;
use std::cell::{Cell, Ref, RefCell};
use std::error::Error;
use std::future::Future;
use std::mem;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_task::{waker, ArcWake};

use crate::config::RuntimeConfig;
use crate::element::{ComponentElement, Render};
use crate::error::ResourceError;
use crate::hooks::effect::{Cleanup, EffectSlot};
use crate::identity::{ComponentId, IdentityTree, NodeKey, SlotUpdate};
use crate::platform::{DefaultScheduler, RuntimeScheduler};
use crate::scope::Scope;
use crate::suspense::{
    CacheEntry, CacheKey, ResourceFuture, ResourceTask, SuspenseCache, Suspended,
};

pub(crate) struct PendingEffect {
    pub(crate) node: NodeKey,
    pub(crate) slot: usize,
    pub(crate) deps: Box<dyn Any>,
    pub(crate) run: Box<dyn FnOnce() -> Cleanup>,
}

/// Outcome of polling the outstanding resource futures once.
pub(crate) struct ResourcePoll {
    pub(crate) resolved: usize,
    pub(crate) failure: Option<ResourceError>,
}

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    config: RuntimeConfig,
    tree: RefCell<IdentityTree>,
    suspense: RefCell<SuspenseCache>,
    tasks: RefCell<Vec<ResourceTask>>,
    effects: RefCell<Vec<PendingEffect>>,
    rendering: Cell<bool>,
    render_requested: Cell<bool>,
    render_hook: RefCell<Option<Rc<dyn Fn()>>>,
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>, config: RuntimeConfig) -> Self {
        Self {
            scheduler,
            config,
            tree: RefCell::new(IdentityTree::new()),
            suspense: RefCell::new(SuspenseCache::default()),
            tasks: RefCell::new(Vec::new()),
            effects: RefCell::new(Vec::new()),
            rendering: Cell::new(false),
            render_requested: Cell::new(false),
            render_hook: RefCell::new(None),
        }
    }

    fn request_render(&self) {
        if self.rendering.get() {
            self.render_requested.set(true);
            return;
        }
        let hook = self.render_hook.borrow().clone();
        match hook {
            Some(render) => render(),
            None => self.render_requested.set(true),
        }
    }
}

/// Per-root rendering state: the identity tree, the update queues, the
/// suspense cache and the resource futures waiting to be polled.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self::with_config(scheduler, RuntimeConfig::default())
    }

    pub fn with_config(scheduler: Arc<dyn RuntimeScheduler>, config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler, config)),
        }
    }

    /// A runtime not attached to any root, whose root identity acts as a
    /// suspense boundary. Used to invoke components one at a time.
    pub fn detached() -> Self {
        let runtime = Self::new(Arc::new(DefaultScheduler));
        runtime
            .inner
            .suspense
            .borrow_mut()
            .register(ComponentId::root());
        runtime
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> RuntimeConfig {
        self.inner.config
    }

    pub fn tree(&self) -> Ref<'_, IdentityTree> {
        self.inner.tree.borrow()
    }

    pub fn debug_dump(&self) -> String {
        self.inner.tree.borrow().debug_dump()
    }

    pub fn is_rendering(&self) -> bool {
        self.inner.rendering.get()
    }

    pub fn pending_resources(&self) -> usize {
        self.inner.tasks.borrow().len()
    }

    pub fn request_render(&self) {
        self.inner.request_render();
    }

    /// Invokes a component outside of any root render, as a child of the
    /// currently active node (the root when idle). Effects it schedules are
    /// discarded.
    pub fn call_component(&self, component: &ComponentElement) -> Render {
        let nested = self.inner.tree.borrow().current().is_some();
        if !nested {
            self.inner.tree.borrow_mut().begin_pass();
        }
        let id = ComponentId::derive(component.name, component.key.as_ref(), self.current_id());
        let node = self.enter(id);
        let result = (component.render)(&Scope::new(self.clone(), node));
        self.exit();
        if !nested {
            self.inner.tree.borrow_mut().end_pass();
            let discarded = mem::take(&mut *self.inner.effects.borrow_mut());
            drop(discarded);
        }
        result
    }

    pub(crate) fn set_render_hook(&self, hook: Option<Rc<dyn Fn()>>) {
        *self.inner.render_hook.borrow_mut() = hook;
    }

    pub(crate) fn render_guard(&self) -> RenderGuard {
        let was_rendering = self.inner.rendering.replace(true);
        RenderGuard {
            runtime: self.clone(),
            was_rendering,
        }
    }

    pub(crate) fn take_render_request(&self) -> bool {
        self.inner.render_requested.replace(false)
    }

    /// Applies every queued update, then makes the root the active node.
    pub(crate) fn begin_pass(&self) {
        self.flush_updates();
        self.inner.tree.borrow_mut().begin_pass();
    }

    pub(crate) fn end_pass(&self) {
        self.inner.tree.borrow_mut().end_pass();
    }

    fn flush_updates(&self) {
        let order = self.inner.config.update_order;
        let keys = self.inner.tree.borrow().keys();
        let mut applied = 0usize;
        for key in keys {
            loop {
                let next = self.inner.tree.borrow_mut().pop_update(key, order);
                let Some((slot, apply)) = next else {
                    break;
                };
                let taken = self.inner.tree.borrow_mut().take_slot_at(key, slot);
                let Some(mut value) = taken else {
                    continue;
                };
                apply(value.as_mut());
                let displaced = self.inner.tree.borrow_mut().replace_slot_at(key, slot, value);
                drop(displaced);
                applied += 1;
            }
        }
        self.inner.tree.borrow_mut().reset_cursors();
        if applied > 0 {
            log::trace!("flushed {applied} queued state updates");
        }
    }

    /// Drops identity nodes the last pass did not visit.
    pub(crate) fn sweep(&self) {
        if !self.inner.config.prune_stale_nodes {
            return;
        }
        let removed = self.inner.tree.borrow_mut().sweep();
        if !removed.is_empty() {
            log::debug!("swept {} stale identity nodes", removed.len());
        }
        drop(removed);
    }

    pub(crate) fn retain_subtree(&self, node: NodeKey) {
        self.inner.tree.borrow_mut().retain_subtree(node);
    }

    pub(crate) fn current_id(&self) -> ComponentId {
        let tree = self.inner.tree.borrow();
        tree.current()
            .and_then(|key| tree.id_of(key))
            .unwrap_or_else(ComponentId::root)
    }

    pub(crate) fn current_node(&self) -> Option<NodeKey> {
        self.inner.tree.borrow().current()
    }

    pub(crate) fn enter(&self, id: ComponentId) -> NodeKey {
        self.inner.tree.borrow_mut().enter(id)
    }

    pub(crate) fn exit(&self) {
        self.inner.tree.borrow_mut().exit();
    }

    pub(crate) fn with_tree<R>(&self, f: impl FnOnce(&IdentityTree) -> R) -> R {
        f(&self.inner.tree.borrow())
    }

    pub(crate) fn with_tree_mut<R>(&self, f: impl FnOnce(&mut IdentityTree) -> R) -> R {
        f(&mut self.inner.tree.borrow_mut())
    }

    pub(crate) fn register_boundary(&self, id: ComponentId) {
        self.inner.suspense.borrow_mut().register(id);
    }

    fn nearest_boundary(&self) -> Option<ComponentId> {
        let tree = self.inner.tree.borrow();
        let suspense = self.inner.suspense.borrow();
        let current = tree.current()?;
        tree.ancestors(current)
            .filter_map(|key| tree.id_of(key))
            .find(|id| suspense.is_boundary(*id))
    }

    /// Reads `key` from the nearest boundary's cache, starting the future on
    /// first access.
    ///
    /// # Panics
    ///
    /// Panics when no suspense boundary encloses the active node, or when
    /// the cached value has a different type than `T`.
    pub(crate) fn read_resource<T, Fut, E>(
        &self,
        key: CacheKey,
        start: impl FnOnce() -> Fut,
    ) -> Result<T, Suspended>
    where
        T: Clone + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
        E: Into<Box<dyn Error>> + 'static,
    {
        let boundary = self
            .nearest_boundary()
            .unwrap_or_else(|| panic!("{key} read outside of any suspense boundary"));
        let entry = self.inner.suspense.borrow().get(boundary, &key);
        let suspended = Suspended {
            boundary: Some(boundary),
            key: Some(key.clone()),
        };
        match entry {
            Some(CacheEntry::Resolved(value)) => {
                return match value.downcast_ref::<T>() {
                    Some(value) => Ok(value.clone()),
                    None => panic!(
                        "{key} was resolved with a value that is not a {}",
                        std::any::type_name::<T>()
                    ),
                };
            }
            Some(CacheEntry::Pending) => return Err(suspended),
            None => {}
        }

        self.inner
            .suspense
            .borrow_mut()
            .mark_pending(boundary, key.clone());
        let future = start();
        let future: ResourceFuture = Box::pin(async move {
            future
                .await
                .map(|value| Rc::new(value) as Rc<dyn Any>)
                .map_err(Into::into)
        });
        log::trace!("started {key} in boundary {boundary}");
        self.inner.tasks.borrow_mut().push(ResourceTask {
            boundary,
            key,
            future,
        });
        self.inner.scheduler.schedule_frame();
        Err(suspended)
    }

    /// Polls every outstanding resource future once. Resolved values land in
    /// their boundary's cache. Failed futures are dropped and their entries
    /// stay pending.
    pub(crate) fn poll_resources(&self) -> ResourcePoll {
        let tasks = mem::take(&mut *self.inner.tasks.borrow_mut());
        let mut poll = ResourcePoll {
            resolved: 0,
            failure: None,
        };
        if tasks.is_empty() {
            return poll;
        }

        let waker = waker(Arc::new(FrameWaker {
            scheduler: Arc::clone(&self.inner.scheduler),
        }));
        let mut cx = Context::from_waker(&waker);
        let mut still_pending = Vec::new();
        for mut task in tasks {
            match task.future.as_mut().poll(&mut cx) {
                Poll::Pending => still_pending.push(task),
                Poll::Ready(Ok(value)) => {
                    log::debug!("{} resolved in boundary {}", task.key, task.boundary);
                    self.inner
                        .suspense
                        .borrow_mut()
                        .resolve(task.boundary, task.key, value);
                    poll.resolved += 1;
                }
                Poll::Ready(Err(source)) => {
                    let err = ResourceError {
                        key: task.key,
                        source,
                    };
                    if poll.failure.is_some() {
                        log::error!("{err}");
                    } else {
                        poll.failure = Some(err);
                    }
                }
            }
        }
        let mut tasks = self.inner.tasks.borrow_mut();
        still_pending.append(&mut tasks);
        *tasks = still_pending;
        poll
    }

    pub(crate) fn cached_entries(&self) -> usize {
        self.inner.suspense.borrow().len()
    }

    pub(crate) fn queue_effect(&self, effect: PendingEffect) {
        self.inner.effects.borrow_mut().push(effect);
    }

    pub(crate) fn queued_effects(&self) -> usize {
        self.inner.effects.borrow().len()
    }

    /// Drops effects queued after `mark`. Used when a suspense boundary
    /// discards the content that scheduled them.
    pub(crate) fn discard_effects_since(&self, mark: usize) {
        let discarded = {
            let mut effects = self.inner.effects.borrow_mut();
            if mark >= effects.len() {
                return;
            }
            effects.split_off(mark)
        };
        drop(discarded);
    }

    /// Runs the effects scheduled by the pass that just committed.
    pub(crate) fn run_effects(&self) {
        loop {
            let effects = mem::take(&mut *self.inner.effects.borrow_mut());
            if effects.is_empty() {
                break;
            }
            for effect in effects {
                self.run_effect(effect);
            }
        }
    }

    fn run_effect(&self, effect: PendingEffect) {
        let PendingEffect {
            node,
            slot,
            deps,
            run,
        } = effect;
        let previous = {
            let mut tree = self.inner.tree.borrow_mut();
            match tree
                .slot_mut_at(node, slot)
                .and_then(|value| value.downcast_mut::<EffectSlot>())
            {
                Some(state) => {
                    state.deps = Some(deps);
                    Some(state.cleanup.take())
                }
                None => None,
            }
        };
        // Node removed before its effect got to run.
        let Some(previous) = previous else {
            return;
        };
        if let Some(cleanup) = previous {
            cleanup.run();
        }

        let cleanup = run();

        let displaced = {
            let mut tree = self.inner.tree.borrow_mut();
            match tree
                .slot_mut_at(node, slot)
                .and_then(|value| value.downcast_mut::<EffectSlot>())
            {
                Some(state) => state.cleanup.replace(cleanup),
                // The owning node went away while the effect ran.
                None => Some(cleanup),
            }
        };
        if let Some(cleanup) = displaced {
            cleanup.run();
        }
    }
}

/// Restores the runtime's rendering flag when a render loop ends, including
/// by unwinding.
pub(crate) struct RenderGuard {
    runtime: Runtime,
    was_rendering: bool,
}

impl Drop for RenderGuard {
    fn drop(&mut self) {
        self.runtime.inner.rendering.set(self.was_rendering);
    }
}

struct FrameWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl ArcWake for FrameWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

/// Weak reference to a [`Runtime`], held by setters and dispatchers that may
/// outlive their root. Every operation is a no-op once the runtime is gone.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn request_render(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.request_render();
        }
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub(crate) fn enqueue(&self, node: NodeKey, slot: usize, apply: SlotUpdate) -> bool {
        match self.0.upgrade() {
            Some(inner) => inner.tree.borrow_mut().enqueue_at(node, slot, apply),
            None => false,
        }
    }

    /// Writes `value` into the slot directly. Returns `false` when the node
    /// no longer exists.
    pub(crate) fn write_slot(&self, node: NodeKey, slot: usize, value: Box<dyn Any>) -> bool {
        let Some(inner) = self.0.upgrade() else {
            return false;
        };
        let exists = inner.tree.borrow().contains(node);
        let displaced = inner.tree.borrow_mut().replace_slot_at(node, slot, value);
        drop(displaced);
        exists
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
