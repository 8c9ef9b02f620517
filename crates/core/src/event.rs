use crate::view::DerivedView;
use std::sync::Arc;

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Sampler task          → `ViewUpdated`, `TickFailed`
/// - Config watcher task   → `ConfigReloaded`
/// - Terminal events       → `Redraw`, `Shutdown`
/// - Ctrl-C handler        → `Shutdown`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Sampler ───────────────────────────────────────────────────────────────
    /// A tick completed; carries the fresh view shared by all consumers.
    ViewUpdated(Arc<DerivedView>),
    /// A tick was abandoned (e.g. clock unavailable). The window is unchanged.
    TickFailed(String),

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,

    // ── Terminal ──────────────────────────────────────────────────────────────
    /// The terminal was resized; nothing changed but the frame.
    Redraw,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}
