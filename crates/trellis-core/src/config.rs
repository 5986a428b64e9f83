/// Order in which a node's queued state updates are applied during a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOrder {
    /// Most recently enqueued update first. Multiple function updates queued
    /// against the same node in one pass therefore apply in reverse order.
    #[default]
    Lifo,
    /// Updates apply in the order they were enqueued.
    Fifo,
}

impl UpdateOrder {
    /// Parses `lifo` / `fifo` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lifo" => Some(UpdateOrder::Lifo),
            "fifo" => Some(UpdateOrder::Fifo),
            _ => None,
        }
    }
}

/// Tunables for a [`crate::Runtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub update_order: UpdateOrder,
    /// Drop identity nodes (and their hook state) that a completed pass did
    /// not visit.
    pub prune_stale_nodes: bool,
    /// Remount a tag node instead of patching it when its `value` attribute
    /// changed. Only the `value` attribute takes part in this check.
    pub remount_on_value_change: bool,
    /// Upper bound on back-to-back passes caused by state changes made while a
    /// pass was running.
    pub max_render_passes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            update_order: UpdateOrder::Lifo,
            prune_stale_nodes: true,
            remount_on_value_change: true,
            max_render_passes: 64,
        }
    }
}

impl RuntimeConfig {
    pub fn with_update_order(mut self, order: UpdateOrder) -> Self {
        self.update_order = order;
        self
    }

    pub fn with_prune_stale_nodes(mut self, prune: bool) -> Self {
        self.prune_stale_nodes = prune;
        self
    }

    pub fn with_remount_on_value_change(mut self, remount: bool) -> Self {
        self.remount_on_value_change = remount;
        self
    }

    pub fn with_max_render_passes(mut self, passes: usize) -> Self {
        self.max_render_passes = passes.max(1);
        self
    }
}
