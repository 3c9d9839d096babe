//! Event port: where accessories report what happened to them.
//!
//! The accessory task awaits each publication before handling its next
//! input, so subscribers observe events in the order the door changed.

use std::future::Future;

use garage_bridge_domain::error::GarageError;
use garage_bridge_domain::event::Event;

/// Sink for accessory events.
pub trait EventPublisher {
    /// Hand one event to every current subscriber. Failing to publish never
    /// aborts the state change that produced the event.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), GarageError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), GarageError>> + Send {
        (**self).publish(event)
    }
}
