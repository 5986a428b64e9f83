use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::RuntimeConfig;
use crate::element::Element;
use crate::error::RenderError;
use crate::host::{Event, EventHandler, Host, HostId};
use crate::materialize::materialize;
use crate::platform::DefaultScheduler;
use crate::reconcile::Reconciler;
use crate::runtime::Runtime;
use crate::vnode::VNode;

struct RootInner<H: Host> {
    runtime: Runtime,
    host: RefCell<H>,
    container: HostId,
    app: RefCell<Option<Element>>,
    previous: RefCell<Option<VNode>>,
    error: RefCell<Option<RenderError>>,
}

impl<H: Host> RootInner<H> {
    /// Renders until no state change is pending, bounded by
    /// `max_render_passes`.
    fn render_passes(&self) -> Result<(), RenderError> {
        if self.app.borrow().is_none() {
            return Err(RenderError::NothingToRender);
        }
        if self.runtime.is_rendering() {
            self.runtime.request_render();
            return Ok(());
        }

        let _guard = self.runtime.render_guard();
        let max_passes = self.runtime.config().max_render_passes;
        for pass in 1..=max_passes {
            self.runtime.take_render_request();
            let app = self
                .app
                .borrow()
                .clone()
                .ok_or(RenderError::NothingToRender)?;
            self.render_once(&app)?;
            if !self.runtime.take_render_request() {
                return Ok(());
            }
            log::trace!("state changed during pass {pass}; rendering again");
        }
        Err(RenderError::RenderLoop { passes: max_passes })
    }

    fn render_once(&self, app: &Element) -> Result<(), RenderError> {
        log::trace!("render pass started");
        self.runtime.begin_pass();
        let materialized = materialize(&self.runtime, app);
        self.runtime.end_pass();
        let mut next = match materialized {
            Ok(next) => next,
            Err(suspended) => {
                self.runtime.discard_effects_since(0);
                return Err(RenderError::UnhandledSuspense(suspended));
            }
        };

        // The committed tree stays in place until the host accepted every
        // mutation, so a failed pass is diffed against it again next time.
        let previous = self.previous.borrow().clone();
        let reconciled = {
            let mut host = self.host.borrow_mut();
            Reconciler::new(&mut *host, self.runtime.config()).reconcile(
                self.container,
                previous,
                next.as_mut(),
            )
        };
        if let Err(err) = reconciled {
            self.runtime.discard_effects_since(0);
            return Err(err.into());
        }
        *self.previous.borrow_mut() = next;

        self.runtime.sweep();
        self.runtime.run_effects();
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("identity tree after pass:\n{}", self.runtime.debug_dump());
        }
        Ok(())
    }

    /// Render entry used when state changes outside of a pass. There is no
    /// caller to hand the error to, so it is logged and kept for
    /// [`Root::take_error`].
    fn rerender_on_state_change(&self) {
        if let Err(err) = self.render_passes() {
            log::error!("re-render failed: {err}");
            *self.error.borrow_mut() = Some(err);
        }
    }
}

/// Owns a host, the container node rendered into, and the runtime that keeps
/// component state between renders.
pub struct Root<H: Host + 'static> {
    inner: Rc<RootInner<H>>,
}

impl<H: Host + 'static> Root<H> {
    pub fn new(host: H, container: HostId) -> Self {
        Self::with_config(host, container, RuntimeConfig::default())
    }

    pub fn with_config(host: H, container: HostId, config: RuntimeConfig) -> Self {
        Self::with_runtime(
            host,
            container,
            Runtime::with_config(Arc::new(DefaultScheduler), config),
        )
    }

    /// Uses `runtime` for this root. The runtime must not be shared with
    /// another root.
    pub fn with_runtime(host: H, container: HostId, runtime: Runtime) -> Self {
        let inner = Rc::new(RootInner {
            runtime,
            host: RefCell::new(host),
            container,
            app: RefCell::new(None),
            previous: RefCell::new(None),
            error: RefCell::new(None),
        });
        let weak = Rc::downgrade(&inner);
        inner.runtime.set_render_hook(Some(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.rerender_on_state_change();
            }
        })));
        Self { inner }
    }

    /// Makes `app` the root element and renders it.
    pub fn render(&self, app: impl Into<Element>) -> Result<(), RenderError> {
        *self.inner.app.borrow_mut() = Some(app.into());
        self.inner.render_passes()
    }

    pub fn rerender(&self) -> Result<(), RenderError> {
        self.inner.render_passes()
    }

    /// Renders nothing, removing every host node and identity node, which
    /// runs all pending effect cleanups.
    pub fn unmount(&self) -> Result<(), RenderError> {
        self.render(Element::Empty)
    }

    /// Delivers `event` to the listeners registered for its name on the
    /// target and then on each ancestor. Returns how many listeners ran.
    pub fn dispatch(&self, event: Event) -> usize {
        let handlers: Vec<EventHandler> = {
            let host = self.inner.host.borrow();
            let mut handlers = Vec::new();
            let mut cursor = Some(event.target);
            while let Some(id) = cursor {
                if let Some(handler) = host.listener(id, &event.name) {
                    handlers.push(handler);
                }
                cursor = host.parent(id);
            }
            handlers
        };
        log::trace!(
            "dispatching {} to host node {} ({} listeners)",
            event.name,
            event.target,
            handlers.len()
        );
        for handler in &handlers {
            handler.call(&event);
        }
        handlers.len()
    }

    pub fn dispatch_event(&self, target: HostId, name: &str) -> usize {
        self.dispatch(Event::new(name, target))
    }

    /// Polls pending resources and re-renders for every batch that resolved,
    /// until nothing more can make progress without outside help.
    pub fn run_until_stalled(&self) -> Result<(), RenderError> {
        let mut failure = None;
        loop {
            let poll = self.inner.runtime.poll_resources();
            if let Some(err) = poll.failure {
                log::error!("{err}");
                failure.get_or_insert(err);
            }
            if poll.resolved == 0 {
                break;
            }
            self.inner.render_passes()?;
        }
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Error from the last re-render triggered by a state change, if any.
    pub fn take_error(&self) -> Option<RenderError> {
        self.inner.error.borrow_mut().take()
    }

    pub fn runtime(&self) -> &Runtime {
        &self.inner.runtime
    }

    pub fn container(&self) -> HostId {
        self.inner.container
    }

    pub fn host(&self) -> Ref<'_, H> {
        self.inner.host.borrow()
    }

    pub fn host_mut(&self) -> RefMut<'_, H> {
        self.inner.host.borrow_mut()
    }

    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.host.borrow())
    }

    /// Abstract tree committed by the last pass.
    pub fn vnode(&self) -> Ref<'_, Option<VNode>> {
        self.inner.previous.borrow()
    }

    pub fn cached_resources(&self) -> usize {
        self.inner.runtime.cached_entries()
    }
}

/// Creates a [`Root`] over `host` and renders `app` into `container`.
pub fn render_root<H: Host + 'static>(
    app: impl Into<Element>,
    host: H,
    container: HostId,
) -> Result<Root<H>, RenderError> {
    let root = Root::new(host, container);
    root.render(app)?;
    Ok(root)
}

#[cfg(test)]
#[path = "tests/root_tests.rs"]
mod tests;
