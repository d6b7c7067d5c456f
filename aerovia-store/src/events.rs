use aerovia_domain::LedgerEvent;
use tokio::sync::broadcast;
use tracing::debug;

/// In-process event fan-out. The ledger publishes after each committed
/// transaction; subscribers (availability caches, notifiers) consume at
/// their own pace. Lagging receivers drop the oldest events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<LedgerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. A send with no live subscribers is not an error.
    pub fn publish(&self, event: LedgerEvent) {
        debug!(?event, "publishing ledger event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(128)
    }
}
