//! # garage-bridged: garage bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialise `tracing` from the configured filter
//! - Start one garage door accessory per valid `[[accessories]]` entry on
//!   the configured hub (HAP client or virtual)
//! - Build the axum router over the running accessories and the event bus
//! - Bind to a TCP port and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use garage_bridge_adapter_http_axum::router;
use garage_bridge_adapter_http_axum::state::AppState;
use garage_bridge_app::event_bus::InProcessEventBus;
use garage_bridged::config::Config;
use garage_bridged::wiring;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        hub = ?config.hub.kind,
        accessories = config.accessories.len(),
        "configuration loaded"
    );

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Accessories
    let accessories = wiring::start_accessories(&config, &event_bus);
    if accessories.is_empty() {
        tracing::warn!("no accessory started, check the [[accessories]] section");
    }

    // HTTP
    let app = router::build(AppState::new(accessories, event_bus));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "garage-bridged listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("garage-bridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
