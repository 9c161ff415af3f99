//! View-invalidation subscribers.
//!
//! `ChannelViewInvalidator` forwards events to whoever owns the rendering
//! cache through a tokio channel, in the same way tracing events are
//! streamed to a frontend.

use lincd_core::view::{ViewInvalidated, ViewInvalidator};
use tokio::sync::mpsc;

/// Discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewInvalidator;

impl ViewInvalidator for NoopViewInvalidator {
    fn invalidate(&self, _path: &str) {}
}

/// Logs every signal at info level. Used by the CLI, which has no view cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingViewInvalidator;

impl ViewInvalidator for LoggingViewInvalidator {
    fn invalidate(&self, path: &str) {
        tracing::info!(path, "view invalidated");
    }
}

/// Sends a `ViewInvalidated` event per signal.
#[derive(Debug, Clone)]
pub struct ChannelViewInvalidator {
    sender: mpsc::UnboundedSender<ViewInvalidated>,
}

impl ChannelViewInvalidator {
    pub fn new(sender: mpsc::UnboundedSender<ViewInvalidated>) -> Self {
        Self { sender }
    }

    /// Creates an invalidator together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewInvalidated>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ViewInvalidator for ChannelViewInvalidator {
    fn invalidate(&self, path: &str) {
        // Non-blocking send; a dropped receiver means nobody caches views
        if self.sender.send(ViewInvalidated::now(path)).is_err() {
            tracing::debug!(path, "view invalidation dropped: no subscriber");
        }
    }
}
