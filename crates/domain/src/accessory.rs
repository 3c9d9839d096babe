//! Virtual accessory metadata and read models.

use serde::{Deserialize, Serialize};

use crate::door::{DoorSnapshot, DoorState, TargetDoorState};
use crate::id::AccessoryId;

/// Static identification metadata (HAP `AccessoryInformation` service).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessoryInformation {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
}

impl Default for AccessoryInformation {
    fn default() -> Self {
        Self {
            manufacturer: "garage-bridge".to_string(),
            model: "Better Garage Door".to_string(),
            serial_number: "GB02".to_string(),
            firmware_revision: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Activation progress of an accessory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessoryStatus {
    /// Waiting for the startup delay or resolving remote services.
    #[default]
    Pending,
    /// Wired to the remote hub and accepting commands.
    Active,
    /// Activation aborted; the accessory stays inert.
    Failed,
}

impl AccessoryStatus {
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccessoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Active => f.write_str("active"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Everything the host surface shows about one accessory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessorySnapshot {
    pub id: AccessoryId,
    pub name: String,
    pub status: AccessoryStatus,
    pub current_door_state: DoorState,
    pub target_door_state: TargetDoorState,
    pub obstruction_detected: bool,
    /// HAP numeric codes of the two door characteristics.
    pub hap: HapCodes,
}

/// `CurrentDoorState` and `TargetDoorState` as HAP controllers encode them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HapCodes {
    pub current_door_state: u8,
    pub target_door_state: u8,
}

impl AccessorySnapshot {
    /// Combine identity, status and door state into one snapshot.
    #[must_use]
    pub fn new(id: AccessoryId, name: &str, status: AccessoryStatus, door: DoorSnapshot) -> Self {
        Self {
            id,
            name: name.to_string(),
            status,
            current_door_state: door.current,
            target_door_state: door.target,
            obstruction_detected: door.obstructed,
            hap: HapCodes {
                current_door_state: door.current.hap_code(),
                target_door_state: door.target.hap_code(),
            },
        }
    }
}
