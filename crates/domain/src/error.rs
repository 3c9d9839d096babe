//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`GarageError`]
//! via `#[from]` or an `into_domain()` helper when crossing a port boundary.

/// Top-level error for garage-bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum GarageError {
    /// A domain invariant or configuration rule was violated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A requested accessory, service, or characteristic does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The accessory is not accepting commands yet (or never will).
    #[error(transparent)]
    NotReady(#[from] NotReadyError),

    /// The remote hub (or the transport to it) failed.
    #[error("remote hub error: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Validation failures for configuration and characteristic values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A mandatory configuration option is absent or blank.
    #[error("property '{0}' is required")]
    MissingField(&'static str),

    /// The HAP client pin is not of the form `XXX-XX-XXX`.
    #[error("invalid hap client pin '{0}', expected XXX-XX-XXX")]
    InvalidPin(String),

    /// A characteristic carried a value that cannot be interpreted.
    #[error("characteristic '{characteristic}' has unsupported value {value}")]
    UnsupportedValue {
        /// Characteristic name.
        characteristic: String,
        /// JSON rendering of the offending value.
        value: String,
    },
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} '{id}' not found")]
pub struct NotFoundError {
    /// Kind of thing being looked up (e.g. `"Accessory"`, `"Characteristic"`).
    pub entity: &'static str,
    /// Identifier or name that was looked up.
    pub id: String,
}

/// The accessory has not finished activation or activation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("accessory '{accessory}' is {status}")]
pub struct NotReadyError {
    /// Accessory display name.
    pub accessory: String,
    /// Human-readable activation status.
    pub status: String,
}
