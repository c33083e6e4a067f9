//! Event emitter trait for pushing catalog and install events to listeners.
//!
//! Implementations handle transport details (channels, UI bindings, logs).

use tokio::sync::mpsc;

use crate::events::AppEvent;

/// Trait for emitting application events.
///
/// # Implementations
///
/// - `NoopEmitter` - For tests and contexts that don't need events
/// - `ChannelEmitter` - Forwards into an unbounded Tokio channel
pub trait AppEventEmitter: Send + Sync {
    /// Emit an application event. Must not block.
    fn emit(&self, event: AppEvent);

    /// Clone this emitter into a boxed trait object.
    fn clone_box(&self) -> Box<dyn AppEventEmitter>;
}

/// Discards all events.
#[derive(Debug, Clone, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    pub const fn new() -> Self {
        Self
    }
}

impl AppEventEmitter for NoopEmitter {
    fn emit(&self, _event: AppEvent) {}

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}

/// Sends every event into an unbounded channel.
///
/// Events emitted after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl ChannelEmitter {
    pub const fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// Create an emitter together with its receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl AppEventEmitter for ChannelEmitter {
    fn emit(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped");
        }
    }

    fn clone_box(&self) -> Box<dyn AppEventEmitter> {
        Box::new(self.clone())
    }
}
