//! Library half of the daemon, so the wiring can be exercised end to end
//! from `tests/` without binding a port.

pub mod config;
pub mod wiring;
