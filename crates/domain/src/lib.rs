//! # garage-bridge-domain
//!
//! Pure domain model for the garage door bridge.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - The **garage door state machine** (door position, target, obstruction)
//! - **Settings** validation for configured accessories
//! - **Remote service** descriptors and typed characteristic values
//! - **Events** published when the virtual accessory changes
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod accessory;
pub mod characteristic;
pub mod door;
pub mod event;
pub mod remote;
pub mod settings;
