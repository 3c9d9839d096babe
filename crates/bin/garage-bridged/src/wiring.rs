//! Accessory wiring: validate each configured entry and start one garage
//! door accessory per valid entry on the configured hub.

use std::collections::HashSet;
use std::sync::Arc;

use garage_bridge_adapter_hap::{HapClient, HapConfig};
use garage_bridge_adapter_virtual::VirtualHub;
use garage_bridge_app::event_bus::InProcessEventBus;
use garage_bridge_app::services::accessories::Accessories;
use garage_bridge_app::services::garage_door::{GarageDoorAdapter, GarageDoorHandle};
use garage_bridge_domain::settings::{AccessoryConfig, GarageDoorSettings};

use crate::config::{Config, HubKind};

/// Start every valid accessory of `config` on the configured hub.
#[must_use]
pub fn start_accessories(config: &Config, event_bus: &Arc<InProcessEventBus>) -> Accessories {
    match config.hub.kind {
        HubKind::Hap => start_hap_accessories(&config.accessories, &config.hub.hap, event_bus),
        HubKind::Virtual => {
            let hub = VirtualHub::new(&config.hub.simulation);
            start_virtual_accessories(&config.accessories, &hub, event_bus)
        }
    }
}

/// One HAP client per accessory, each authenticated with its own pin.
#[must_use]
pub fn start_hap_accessories(
    entries: &[AccessoryConfig],
    hap: &HapConfig,
    event_bus: &Arc<InProcessEventBus>,
) -> Accessories {
    let handles = validated(entries)
        .filter_map(|settings| match HapClient::new(hap, &settings.hap_client_pin) {
            Ok(client) => Some(GarageDoorAdapter::start(
                settings,
                client,
                Arc::clone(event_bus),
            )),
            Err(err) => {
                tracing::error!(accessory = %settings.name, %err, "unable to create HAP client, aborting");
                None
            }
        })
        .collect();
    Accessories::new(handles)
}

/// Every accessory shares `hub`; a simulated door is added for each one.
#[must_use]
pub fn start_virtual_accessories(
    entries: &[AccessoryConfig],
    hub: &VirtualHub,
    event_bus: &Arc<InProcessEventBus>,
) -> Accessories {
    let handles: Vec<GarageDoorHandle> = validated(entries)
        .map(|settings| {
            hub.add_door(&settings.switch_service_name, &settings.sensor_service_name);
            GarageDoorAdapter::start(settings, hub.clone(), Arc::clone(event_bus))
        })
        .collect();
    Accessories::new(handles)
}

/// Valid entries with unique names, in configuration order. Rejected entries
/// are logged and skipped.
fn validated(entries: &[AccessoryConfig]) -> impl Iterator<Item = GarageDoorSettings> + '_ {
    let mut names = HashSet::new();
    entries
        .iter()
        .enumerate()
        .filter_map(move |(index, entry)| {
            let settings = match GarageDoorSettings::from_config(entry.clone()) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::error!(index, name = ?entry.name, %err, "invalid accessory configuration, aborting");
                    return None;
                }
            };
            if !names.insert(settings.name.clone()) {
                tracing::error!(index, accessory = %settings.name, "duplicate accessory name, aborting");
                return None;
            }
            Some(settings)
        })
}
