//! # garage-bridge-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** over the running accessories
//!   (`/api/accessories`, `/api/accessories/{name}/target`, …)
//! - Stream accessory events as **Server-Sent Events** (`/api/events/stream`)
//! - Map HTTP requests into accessory handle calls (driving adapter)
//! - Map [`GarageError`](garage_bridge_domain::error::GarageError) into
//!   status codes
//!
//! ## Dependency rule
//! Depends on `garage-bridge-app` (for handles and the event bus) and
//! `garage-bridge-domain` (for types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
