//! Fixtures shared by the handler tests.

use std::sync::Arc;

use garage_bridge_adapter_virtual::{VirtualConfig, VirtualHub};
use garage_bridge_app::event_bus::InProcessEventBus;
use garage_bridge_app::services::accessories::Accessories;
use garage_bridge_app::services::garage_door::{GarageDoorAdapter, GarageDoorHandle};
use garage_bridge_domain::settings::{AccessoryConfig, GarageDoorSettings};

use crate::state::AppState;

pub(crate) fn empty_state() -> AppState {
    AppState::new(Accessories::default(), Arc::new(InProcessEventBus::new(16)))
}

pub(crate) fn accessory_config(name: &str, switch: &str, sensor: &str) -> AccessoryConfig {
    AccessoryConfig {
        name: Some(name.to_string()),
        switch_service_name: Some(switch.to_string()),
        sensor_service_name: Some(sensor.to_string()),
        hap_client_pin: Some("031-45-154".to_string()),
        open_time: Some(5000),
        init_delay: Some(0),
        ..AccessoryConfig::default()
    }
}

/// One activated "Garage" accessory backed by a virtual hub, plus one
/// "Attic" accessory whose services do not exist.
pub(crate) async fn garage_state() -> (AppState, VirtualHub) {
    let hub = VirtualHub::new(&VirtualConfig {
        travel_time_ms: 1000,
        jammed: Vec::new(),
    });
    hub.add_door("Garage Switch", "Garage Sensor");
    let bus = Arc::new(InProcessEventBus::new(64));

    let handles: Vec<GarageDoorHandle> = [
        accessory_config("Garage", "Garage Switch", "Garage Sensor"),
        accessory_config("Attic", "Attic Switch", "Attic Sensor"),
    ]
    .into_iter()
    .map(|config| {
        let settings = GarageDoorSettings::from_config(config).unwrap();
        GarageDoorAdapter::start(settings, hub.clone(), Arc::clone(&bus))
    })
    .collect();

    for handle in &handles {
        handle.settled().await;
    }

    (AppState::new(Accessories::new(handles), bus), hub)
}
