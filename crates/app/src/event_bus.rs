//! Fan-out of accessory events to the host surface.
//!
//! Every accessory task publishes into one shared [`InProcessEventBus`]; the
//! SSE endpoint holds one receiver per connected client. A client that falls
//! more than `capacity` events behind loses the oldest ones and is told how
//! many it missed ([`broadcast::error::RecvError::Lagged`]).

use std::future::Future;

use tokio::sync::broadcast;

use garage_bridge_domain::error::GarageError;
use garage_bridge_domain::event::Event;

use crate::ports::EventPublisher;

/// Shared broadcast channel for [`Event`]s of every accessory.
pub struct InProcessEventBus {
    sender: broadcast::Sender<Event>,
}

impl InProcessEventBus {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event published from now on, whatever the accessory.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl EventPublisher for InProcessEventBus {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), GarageError>> + Send {
        tracing::trace!(
            accessory = %event.accessory,
            event_type = ?event.event_type,
            "publishing event"
        );
        // nobody listening is not an error for the accessory
        if self.sender.send(event).is_err() {
            tracing::trace!("event dropped, no subscriber");
        }
        async { Ok(()) }
    }
}
