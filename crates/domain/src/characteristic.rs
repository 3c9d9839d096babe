//! Typed characteristic values exchanged with the remote hub.

use serde::{Deserialize, Serialize};

/// A single characteristic value as carried by HAP JSON.
///
/// HAP sends booleans as either `true`/`false` or `1`/`0` depending on the
/// accessory, so readers should go through [`as_flag`](Self::as_flag)
/// rather than matching on the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(serde_json::Value),
}

impl CharacteristicValue {
    /// Interpret the value as a binary flag.
    ///
    /// Numbers are `true` when non-zero. Strings, objects and `null` have no
    /// flag interpretation and yield `None`.
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(value) => Some(*value != 0),
            Self::Float(value) => Some(*value != 0.0),
            Self::String(_) | Self::Json(_) => None,
        }
    }
}

impl std::fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}
