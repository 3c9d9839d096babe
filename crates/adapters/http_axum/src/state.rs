//! Shared application state for axum handlers.

use std::sync::Arc;

use garage_bridge_app::event_bus::InProcessEventBus;
use garage_bridge_app::services::accessories::Accessories;

/// Application state shared across all axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Running accessories, looked up by name.
    pub accessories: Arc<Accessories>,
    /// Event bus feeding the SSE stream.
    pub event_bus: Arc<InProcessEventBus>,
}

impl AppState {
    pub fn new(accessories: Accessories, event_bus: Arc<InProcessEventBus>) -> Self {
        Self {
            accessories: Arc::new(accessories),
            event_bus,
        }
    }
}
