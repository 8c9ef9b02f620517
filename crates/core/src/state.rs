use crate::view::DerivedView;
use std::sync::Arc;

/// Central application state — all widgets read from this snapshot.
#[derive(Debug, Clone, Default)]
pub struct DashState {
    /// View produced by the most recent successful tick; `None` until then.
    pub view: Option<Arc<DerivedView>>,
    /// Message of the last failed tick, cleared by the next good one.
    pub last_error: Option<String>,
    /// Number of failed ticks since start.
    pub failed_ticks: u64,
}

impl DashState {
    /// Borrow the current view, if any tick has completed.
    #[must_use]
    pub fn view(&self) -> Option<&DerivedView> {
        self.view.as_deref()
    }

    pub fn apply_view(&mut self, view: Arc<DerivedView>) {
        self.view = Some(view);
        self.last_error = None;
    }

    pub fn record_failure(&mut self, reason: String) {
        self.failed_ticks += 1;
        self.last_error = Some(reason);
    }
}
