//! Change-notification broadcast for durable mailbox writes.
//!
//! Every successful `save` publishes the namespaced key that was written.
//! Subscribers compare the key against their own partner namespace and
//! re-read the durable layer when it matches; they never trust another
//! subscriber's in-memory state.

use tokio::sync::broadcast;

/// Capacity of the broadcast buffer. A receiver that falls further behind
/// than this observes `Lagged` and reloads the latest snapshot, which is the
/// same last-write-wins outcome as replaying every event.
const EVENT_CAPACITY: usize = 64;

/// Notification that a durable mailbox key was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxEvent {
    /// The namespaced key that changed, e.g. `mailbox:partnerA`.
    pub key: String,
}

/// Process-wide publish/subscribe channel for mailbox writes.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MailboxEvent>,
}

impl EventBus {
    /// Create a new event bus.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribe to mailbox write notifications.
    ///
    /// Dropping the receiver unsubscribes; views tie this to their
    /// mount/unmount lifecycle.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MailboxEvent> {
        self.sender.subscribe()
    }

    /// Publish a write notification for the given key.
    ///
    /// Delivery to zero subscribers is not an error.
    pub fn publish(&self, key: String) {
        let _ = self.sender.send(MailboxEvent { key });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
