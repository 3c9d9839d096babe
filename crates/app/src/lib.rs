//! # garage-bridge-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RemoteRegistry`: resolve, write and monitor services on the remote hub
//!   - `EventPublisher`: publish accessory events
//! - Define **driving/inbound ports** as use-case structs:
//!   - `GarageDoorAdapter` / `GarageDoorHandle`: one virtual garage door
//!     opener per configured accessory
//!   - `Accessories`: lookup of running accessories by name
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `garage-bridge-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
