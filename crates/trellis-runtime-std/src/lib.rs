//! Standard runtime services backed by Rust's `std` library.
//!
//! [`StdScheduler`] records frame requests made by the core runtime (state
//! changes, resource wake-ups) so an event loop can poll them, and
//! [`StdRuntime`] bundles it with a [`trellis_core::Runtime`] configured from
//! the environment.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use trellis_core::{
    Host, HostId, RenderError, Root, Runtime, RuntimeConfig, RuntimeHandle, RuntimeScheduler,
    UpdateOrder,
};

/// Environment variable selecting the state update order (`lifo` or `fifo`).
pub const UPDATE_ORDER_VAR: &str = "TRELLIS_UPDATE_ORDER";
/// Environment variable bounding back-to-back render passes.
pub const MAX_RENDER_PASSES_VAR: &str = "TRELLIS_MAX_RENDER_PASSES";

type FrameNotify = Arc<dyn Fn() + Send + Sync + 'static>;

/// Collects the frame requests a [`Runtime`] makes when state changes or a
/// resource wakes up.
///
/// Requests arriving between two frames fold into one pending frame. The
/// event loop drains them with [`StdScheduler::take_requests`], and an
/// optional notify hook fires once per pending frame so a sleeping loop can
/// be woken from any thread.
pub struct StdScheduler {
    pending: AtomicUsize,
    notify: RwLock<Option<FrameNotify>>,
}

impl StdScheduler {
    pub fn new() -> Self {
        Self {
            pending: AtomicUsize::new(0),
            notify: RwLock::new(None),
        }
    }

    /// Requests folded into the pending frame, clearing them. Zero means no
    /// frame is due.
    pub fn take_requests(&self) -> usize {
        self.pending.swap(0, Ordering::SeqCst)
    }

    pub fn is_frame_due(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    /// Installs the hook called when a frame becomes due.
    pub fn set_notify(&self, notify: impl Fn() + Send + Sync + 'static) {
        *self.notify.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(notify));
    }

    pub fn clear_notify(&self) {
        *self.notify.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn notify_frame_due(&self) {
        // Cloned out so the hook may reinstall itself without deadlocking.
        let notify = self
            .notify
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(notify) = notify {
            notify();
        }
    }
}

impl Default for StdScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StdScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdScheduler")
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl RuntimeScheduler for StdScheduler {
    fn schedule_frame(&self) {
        if self.pending.fetch_add(1, Ordering::SeqCst) == 0 {
            self.notify_frame_due();
        }
    }
}

/// Builds a [`RuntimeConfig`] from variables returned by `lookup`. Unset
/// variables keep their defaults; malformed ones are logged and ignored.
pub fn config_from_vars(lookup: impl Fn(&str) -> Option<String>) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    if let Some(value) = lookup(UPDATE_ORDER_VAR) {
        match UpdateOrder::parse(&value) {
            Some(order) => config = config.with_update_order(order),
            None => log::warn!("ignoring {UPDATE_ORDER_VAR}={value:?}; expected lifo or fifo"),
        }
    }
    if let Some(value) = lookup(MAX_RENDER_PASSES_VAR) {
        match value.trim().parse::<usize>() {
            Ok(passes) if passes > 0 => config = config.with_max_render_passes(passes),
            _ => log::warn!(
                "ignoring {MAX_RENDER_PASSES_VAR}={value:?}; expected a positive integer"
            ),
        }
    }
    config
}

/// [`config_from_vars`] over the process environment.
pub fn config_from_env() -> RuntimeConfig {
    config_from_vars(|name| std::env::var(name).ok())
}

/// Convenience container bundling the standard scheduler with a runtime.
#[derive(Clone)]
pub struct StdRuntime {
    scheduler: Arc<StdScheduler>,
    runtime: Runtime,
}

impl StdRuntime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let scheduler = Arc::new(StdScheduler::default());
        let runtime = Runtime::with_config(scheduler.clone(), config);
        Self { scheduler, runtime }
    }

    /// Runtime configured by [`config_from_env`].
    pub fn from_env() -> Self {
        let config = config_from_env();
        log::debug!("runtime config from environment: {config:?}");
        Self::with_config(config)
    }

    pub fn runtime(&self) -> Runtime {
        self.runtime.clone()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn scheduler(&self) -> Arc<StdScheduler> {
        Arc::clone(&self.scheduler)
    }

    /// Creates a root over `host` that renders with this runtime. A runtime
    /// serves a single root.
    pub fn root<H: Host + 'static>(&self, host: H, container: HostId) -> Root<H> {
        Root::with_runtime(host, container, self.runtime())
    }

    pub fn is_frame_due(&self) -> bool {
        self.scheduler.is_frame_due()
    }

    pub fn set_frame_notify(&self, notify: impl Fn() + Send + Sync + 'static) {
        self.scheduler.set_notify(notify);
    }

    pub fn clear_frame_notify(&self) {
        self.scheduler.clear_notify();
    }

    /// Runs one frame for `root` if one was requested: polls the resources
    /// that woke up and re-renders what they unblocked. Returns whether a
    /// frame ran.
    pub fn run_frame<H: Host + 'static>(&self, root: &Root<H>) -> Result<bool, RenderError> {
        let requests = self.scheduler.take_requests();
        if requests == 0 {
            return Ok(false);
        }
        log::trace!(
            "running frame for {requests} requests with {} pending resources",
            self.runtime.pending_resources()
        );
        root.run_until_stalled()?;
        Ok(true)
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("scheduler", &self.scheduler)
            .field("config", &self.runtime.config())
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use trellis_core::prelude::*;
    use trellis_core::MemoryHost;

    use super::*;

    fn mount(runtime: &StdRuntime) -> Root<MemoryHost> {
        let mut host = MemoryHost::new();
        let container = host.create_container("root");
        runtime.root(host, container)
    }

    #[test]
    fn resource_wake_requests_a_frame() {
        let runtime = StdRuntime::new();
        let wakes = Arc::new(AtomicUsize::new(0));
        {
            let wakes = Arc::clone(&wakes);
            runtime.set_frame_notify(move || {
                wakes.fetch_add(1, Ordering::SeqCst);
            });
        }

        let (sender, receiver) = oneshot::channel::<String>();
        let receiver = Rc::new(RefCell::new(Some(receiver)));
        let app = Element::suspense(
            "waiting",
            Element::component("Inbox", move |cx| {
                let receiver = Rc::clone(&receiver);
                let message: String = use_resource(cx, "inbox", move || {
                    receiver.borrow_mut().take().expect("started once")
                })?;
                Ok(tag("p").child(message).into())
            }),
        );
        let root = mount(&runtime);
        root.render(app).unwrap();
        let html = || root.with_host(|host| host.inner_html(root.container()));

        // Starting the resource asks for a frame.
        assert!(runtime.run_frame(&root).unwrap());
        assert_eq!(html(), "waiting");
        assert!(!runtime.run_frame(&root).unwrap());

        sender.send("hello".to_string()).unwrap();
        assert!(runtime.run_frame(&root).unwrap());
        assert_eq!(html(), "<p>hello</p>");
        assert!(wakes.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn requests_between_frames_fold_into_one() {
        let scheduler = StdScheduler::new();
        let notified = Arc::new(AtomicUsize::new(0));
        {
            let notified = Arc::clone(&notified);
            scheduler.set_notify(move || {
                notified.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(!scheduler.is_frame_due());

        scheduler.schedule_frame();
        scheduler.schedule_frame();
        scheduler.schedule_frame();
        assert!(scheduler.is_frame_due());
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.take_requests(), 3);
        assert_eq!(scheduler.take_requests(), 0);

        scheduler.clear_notify();
        scheduler.schedule_frame();
        assert_eq!(notified.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.take_requests(), 1);
    }

    #[test]
    fn state_change_rerenders_through_shared_runtime() {
        let runtime = StdRuntime::new();
        let root = mount(&runtime);
        root.render(Element::component("Toggle", |cx| {
            let (on, set_on) = use_state(cx, || false);
            Ok(tag("button")
                .on("click", move |_| set_on.set(!on))
                .child(if on { "on" } else { "off" })
                .into())
        }))
        .unwrap();
        let button = root.with_host(|host| host.children(root.container())[0]);
        root.dispatch_event(button, "click");
        assert_eq!(
            root.with_host(|host| host.text_content(root.container())),
            "on"
        );
        assert!(runtime.runtime_handle().is_alive());
    }

    #[test]
    fn config_reads_known_variables() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(UPDATE_ORDER_VAR, "FIFO"), (MAX_RENDER_PASSES_VAR, " 8 ")]);
        let config = config_from_vars(|name| vars.get(name).map(|value| value.to_string()));
        assert_eq!(config.update_order, UpdateOrder::Fifo);
        assert_eq!(config.max_render_passes, 8);
    }

    #[test]
    fn config_ignores_malformed_variables() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(UPDATE_ORDER_VAR, "random"), (MAX_RENDER_PASSES_VAR, "0")]);
        let config = config_from_vars(|name| vars.get(name).map(|value| value.to_string()));
        assert_eq!(config, RuntimeConfig::default());
    }
}
