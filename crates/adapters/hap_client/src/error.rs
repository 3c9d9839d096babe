//! HAP adapter error types.

use garage_bridge_domain::error::{GarageError, ValidationError};

/// Errors specific to the HAP client adapter.
#[derive(Debug, thiserror::Error)]
pub enum HapError {
    /// The pin is not of the form `XXX-XX-XXX`.
    #[error("invalid hap client pin")]
    InvalidPin(String),

    /// The configured base URL cannot be parsed.
    #[error("invalid hub url '{0}'")]
    InvalidUrl(String),

    /// The pin cannot be sent as a header value.
    #[error("invalid authorization header")]
    Header(#[source] reqwest::header::InvalidHeaderValue),

    /// Transport failure or timeout.
    #[error("HAP request failed")]
    Http(#[from] reqwest::Error),

    /// The hub answered with an unexpected status (e.g. 470 for a wrong pin).
    #[error("HAP server answered with status {0}")]
    Status(u16),

    /// The hub answered with a body that is not HAP JSON.
    #[error("failed to parse HAP payload")]
    PayloadParse(#[source] serde_json::Error),
}

impl HapError {
    /// Convert into a [`GarageError`] for propagation across port boundaries.
    #[must_use]
    pub fn into_domain(self) -> GarageError {
        match self {
            Self::InvalidPin(pin) => GarageError::Validation(ValidationError::InvalidPin(pin)),
            other => GarageError::Remote(Box::new(other)),
        }
    }
}

impl From<HapError> for GarageError {
    fn from(err: HapError) -> Self {
        err.into_domain()
    }
}
