//! Directory of the running accessories, looked up by display name.

use garage_bridge_domain::accessory::AccessorySnapshot;
use garage_bridge_domain::error::{GarageError, NotFoundError};

use crate::services::garage_door::GarageDoorHandle;

/// Every accessory that passed validation, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct Accessories {
    handles: Vec<GarageDoorHandle>,
}

impl Accessories {
    #[must_use]
    pub fn new(handles: Vec<GarageDoorHandle>) -> Self {
        Self { handles }
    }

    /// Look up an accessory by its configured name.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError::NotFound`] when no accessory has that name.
    pub fn get(&self, name: &str) -> Result<&GarageDoorHandle, GarageError> {
        self.handles
            .iter()
            .find(|handle| handle.name() == name)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Accessory",
                    id: name.to_string(),
                }
                .into()
            })
    }

    /// Snapshots of every accessory.
    #[must_use]
    pub fn snapshots(&self) -> Vec<AccessorySnapshot> {
        self.handles.iter().map(GarageDoorHandle::snapshot).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GarageDoorHandle> {
        self.handles.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_not_found_for_unknown_name() {
        let accessories = Accessories::default();
        assert!(matches!(
            accessories.get("Garage"),
            Err(GarageError::NotFound(_))
        ));
        assert!(accessories.is_empty());
        assert!(accessories.snapshots().is_empty());
    }
}
