use trellis_core::{
    Element, Event, HostId, MemoryHost, Mutation, RenderError, Root, RuntimeConfig,
};

/// Headless harness for exercising components in tests.
///
/// `TestRoot` owns a [`MemoryHost`] and a [`Root`] rendering into a `root`
/// container, and exposes helpers for firing events at nodes found by their
/// `id` attribute and for inspecting the produced markup.
pub struct TestRoot {
    root: Root<MemoryHost>,
}

impl TestRoot {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let mut host = MemoryHost::new();
        let container = host.create_container("root");
        Self {
            root: Root::with_config(host, container, config),
        }
    }

    /// Install `content` and perform an initial render.
    pub fn set_content(&self, content: impl Into<Element>) -> Result<(), RenderError> {
        self.root.render(content)
    }

    pub fn rerender(&self) -> Result<(), RenderError> {
        self.root.rerender()
    }

    /// Resolve pending resources and surface any error left behind by a
    /// render triggered from an event handler.
    pub fn pump_until_idle(&self) -> Result<(), RenderError> {
        if let Some(err) = self.root.take_error() {
            return Err(err);
        }
        self.root.run_until_stalled()?;
        match self.root.take_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Host node whose `id` attribute equals `id`.
    pub fn find(&self, id: &str) -> Option<HostId> {
        self.root
            .with_host(|host| host.find_by_attribute(self.root.container(), "id", id))
    }

    fn require(&self, id: &str) -> HostId {
        self.find(id)
            .unwrap_or_else(|| panic!("no node with id {id:?} in:\n{}", self.dump_tree()))
    }

    /// Dispatches `click` at `#id`, then pumps. Panics when `#id` is absent.
    pub fn click(&self, id: &str) -> Result<usize, RenderError> {
        let handled = self.root.dispatch_event(self.require(id), "click");
        self.pump_until_idle()?;
        Ok(handled)
    }

    /// Dispatches `input` carrying `value` at `#id`, then pumps.
    pub fn input(&self, id: &str, value: &str) -> Result<usize, RenderError> {
        let event = Event::new("input", self.require(id)).with_value(value);
        let handled = self.root.dispatch(event);
        self.pump_until_idle()?;
        Ok(handled)
    }

    pub fn html(&self) -> String {
        self.root
            .with_host(|host| host.inner_html(self.root.container()))
    }

    pub fn text(&self) -> String {
        self.root
            .with_host(|host| host.text_content(self.root.container()))
    }

    pub fn text_of(&self, id: &str) -> String {
        let node = self.require(id);
        self.root.with_host(|host| host.text_content(node))
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<String> {
        let node = self.require(id);
        self.root
            .with_host(|host| host.attribute(node, name).map(str::to_string))
    }

    pub fn dump_tree(&self) -> String {
        self.root
            .with_host(|host| host.dump_tree(self.root.container()))
    }

    pub fn take_mutations(&self) -> Vec<Mutation> {
        self.root.host_mut().take_mutations()
    }

    pub fn root(&self) -> &Root<MemoryHost> {
        &self.root
    }
}

impl Default for TestRoot {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for tests that only need temporary access to a
/// [`TestRoot`].
pub fn run_test_root<R>(f: impl FnOnce(&TestRoot) -> R) -> R {
    let root = TestRoot::new();
    f(&root)
}
