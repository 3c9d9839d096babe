//! # garage-bridge-adapter-virtual
//!
//! In-memory remote hub with simulated garage doors, for demos and tests.
//!
//! ## Provided devices
//!
//! Each door registered with [`VirtualHub::add_door`] exposes two services:
//!
//! | Service | Characteristic | Behaviour |
//! |---------|----------------|-----------|
//! | Switch | `On` | Momentary: a truthy write starts the door, reads stay `false` |
//! | ContactSensor | `ContactSensorState` | Flips after `travel_time_ms` unless the door is jammed |
//!
//! ## Dependency rule
//!
//! Depends on `garage-bridge-app` (port traits) and `garage-bridge-domain` only.

pub mod config;
mod devices;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use garage_bridge_app::ports::RemoteRegistry;
use garage_bridge_app::ports::remote::ServiceUpdates;
use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::error::{GarageError, NotFoundError};
use garage_bridge_domain::remote::RemoteService;

pub use config::VirtualConfig;
use devices::VirtualDoor;

const FIRST_AID: u64 = 2;
const UPDATES_CAPACITY: usize = 64;
const MONITOR_BUFFER: usize = 32;

struct Inner {
    doors: Mutex<Vec<VirtualDoor>>,
    travel_time: Duration,
    jammed: Vec<String>,
    updates: broadcast::Sender<ServiceUpdates>,
}

/// Simulated hub. Cheap to clone; clones share the same doors.
#[derive(Clone)]
pub struct VirtualHub {
    inner: Arc<Inner>,
}

impl VirtualHub {
    #[must_use]
    pub fn new(config: &VirtualConfig) -> Self {
        let (updates, _) = broadcast::channel(UPDATES_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                doors: Mutex::new(Vec::new()),
                travel_time: Duration::from_millis(config.travel_time_ms),
                jammed: config.jammed.clone(),
                updates,
            }),
        }
    }

    /// Register a closed door. A door whose sensor is already registered is
    /// left untouched.
    pub fn add_door(&self, switch_name: &str, sensor_name: &str) {
        let mut doors = self.lock_doors();
        if doors.iter().any(|door| door.sensor.name() == sensor_name) {
            return;
        }
        let aid = FIRST_AID + 2 * doors.len() as u64;
        let jammed = self.inner.jammed.iter().any(|name| name == sensor_name);
        doors.push(VirtualDoor::new(aid, switch_name, sensor_name, jammed));
        tracing::debug!(switch = switch_name, sensor = sensor_name, jammed, "virtual door added");
    }

    /// Jam or free the door watched by `sensor_name`.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError::NotFound`] when no such sensor exists.
    pub fn set_jammed(&self, sensor_name: &str, jammed: bool) -> Result<(), GarageError> {
        let mut doors = self.lock_doors();
        let door = find_by_sensor(&mut doors, sensor_name)?;
        door.jammed = jammed;
        Ok(())
    }

    /// Force the contact reading, as if the door was moved by hand.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError::NotFound`] when no such sensor exists.
    pub fn set_contact(&self, sensor_name: &str, open: bool) -> Result<(), GarageError> {
        let service = {
            let mut doors = self.lock_doors();
            let door = find_by_sensor(&mut doors, sensor_name)?;
            door.sensor.set_open(open);
            door.sensor.service()
        };
        self.broadcast(vec![service]);
        Ok(())
    }

    /// Pulses received by the switch called `switch_name`.
    #[must_use]
    pub fn pulses(&self, switch_name: &str) -> Option<u32> {
        self.lock_doors()
            .iter()
            .find(|door| door.switch.name() == switch_name)
            .map(|door| door.switch.pulses())
    }

    fn lock_doors(&self) -> MutexGuard<'_, Vec<VirtualDoor>> {
        self.inner
            .doors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn broadcast(&self, batch: ServiceUpdates) {
        // no subscriber yet is fine
        let _ = self.inner.updates.send(batch);
    }

    fn finish_travel(&self, aid: u64) {
        let service = {
            let mut doors = self.lock_doors();
            let Some(door) = doors.iter_mut().find(|door| door.switch.aid() == aid) else {
                return;
            };
            door.finish_travel()
        };
        tracing::debug!(sensor = %service.service_name, "virtual door stopped");
        self.broadcast(vec![service]);
    }
}

fn find_by_sensor<'a>(
    doors: &'a mut [VirtualDoor],
    sensor_name: &str,
) -> Result<&'a mut VirtualDoor, GarageError> {
    doors
        .iter_mut()
        .find(|door| door.sensor.name() == sensor_name)
        .ok_or_else(|| {
            NotFoundError {
                entity: "Service",
                id: sensor_name.to_string(),
            }
            .into()
        })
}

impl RemoteRegistry for VirtualHub {
    async fn list_services(&self) -> Result<Vec<RemoteService>, GarageError> {
        Ok(self
            .lock_doors()
            .iter()
            .flat_map(VirtualDoor::services)
            .collect())
    }

    async fn set_characteristic(
        &self,
        service: &RemoteService,
        characteristic: &str,
        value: CharacteristicValue,
    ) -> Result<(), GarageError> {
        let not_found = || NotFoundError {
            entity: "Characteristic",
            id: format!("{}/{characteristic}", service.service_name),
        };

        let start = {
            let mut doors = self.lock_doors();
            let door = doors
                .iter_mut()
                .find(|door| door.switch.aid() == service.aid)
                .ok_or_else(not_found)?;
            if characteristic != "On" {
                return Err(not_found().into());
            }
            if !door.switch.write(&value) {
                return Ok(());
            }
            if door.can_move() {
                door.moving = true;
                true
            } else {
                tracing::debug!(
                    switch = door.switch.name(),
                    jammed = door.jammed,
                    "virtual door did not move"
                );
                false
            }
        };

        if start {
            let hub = self.clone();
            let aid = service.aid;
            let travel_time = self.inner.travel_time;
            tokio::spawn(async move {
                tokio::time::sleep(travel_time).await;
                hub.finish_travel(aid);
            });
        }
        Ok(())
    }

    async fn monitor(&self) -> Result<mpsc::Receiver<ServiceUpdates>, GarageError> {
        let mut source = self.inner.updates.subscribe();
        let (tx, rx) = mpsc::channel(MONITOR_BUFFER);
        tokio::spawn(async move {
            loop {
                match source.recv().await {
                    Ok(batch) => {
                        if tx.send(batch).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "virtual monitor lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        Ok(rx)
    }
}
