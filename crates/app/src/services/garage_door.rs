//! Garage door accessory: bridges a remote switch and contact sensor into
//! one virtual garage door opener.
//!
//! [`GarageDoorAdapter::start`] spawns one task per accessory. The task waits
//! for the configured startup delay, resolves the switch and sensor services,
//! subscribes to hub updates, and then serves three inputs from a single
//! `select!` loop so that they never interleave:
//!
//! - commands from [`GarageDoorHandle::set_target`],
//! - obstruction timer expiries,
//! - batches of remote service updates.
//!
//! The door state lives inside the task. Everything else reads it through
//! the `watch` snapshot held by the handle.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};

use garage_bridge_domain::accessory::{AccessoryInformation, AccessorySnapshot, AccessoryStatus};
use garage_bridge_domain::characteristic::CharacteristicValue;
use garage_bridge_domain::door::{
    DoorSnapshot, DoorState, GarageDoor, TargetDoorState, Transition,
};
use garage_bridge_domain::error::{GarageError, NotReadyError};
use garage_bridge_domain::event::{Event, EventType};
use garage_bridge_domain::id::AccessoryId;
use garage_bridge_domain::remote::RemoteService;
use garage_bridge_domain::settings::GarageDoorSettings;

use crate::ports::remote::ServiceUpdates;
use crate::ports::{EventPublisher, RemoteRegistry};
use crate::services::resolver::{self, ActivationError};

/// Value written to the switch characteristic to trigger the opener.
const PULSE: CharacteristicValue = CharacteristicValue::Int(1);

const COMMAND_BUFFER: usize = 16;

enum Command {
    SetTarget {
        target: TargetDoorState,
        ack: oneshot::Sender<()>,
    },
}

/// Remote services the accessory is wired to after activation.
struct Wiring {
    switch: RemoteService,
    sensor: RemoteService,
    updates: mpsc::Receiver<ServiceUpdates>,
}

/// The per-accessory task state.
pub struct GarageDoorAdapter<R, P> {
    id: AccessoryId,
    settings: GarageDoorSettings,
    registry: R,
    publisher: P,
    door: GarageDoor,
    status: AccessoryStatus,
    snapshot_tx: watch::Sender<AccessorySnapshot>,
    commands: mpsc::Receiver<Command>,
    timer_tx: mpsc::UnboundedSender<Transition>,
    timer_rx: mpsc::UnboundedReceiver<Transition>,
}

impl<R, P> GarageDoorAdapter<R, P>
where
    R: RemoteRegistry + Clone + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    /// Create the virtual accessory (closed, not obstructed) and spawn its
    /// task. Activation starts after `settings.init_delay`.
    pub fn start(settings: GarageDoorSettings, registry: R, publisher: P) -> GarageDoorHandle {
        let (adapter, handle) = Self::new(settings, registry, publisher);
        tokio::spawn(adapter.run());
        handle
    }

    fn new(settings: GarageDoorSettings, registry: R, publisher: P) -> (Self, GarageDoorHandle) {
        let id = AccessoryId::new();
        let door = GarageDoor::new(settings.timer_policy);
        let status = AccessoryStatus::Pending;
        let (snapshot_tx, snapshot_rx) = watch::channel(AccessorySnapshot::new(
            id,
            &settings.name,
            status,
            door.snapshot(),
        ));
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        if settings.open_time.is_none() {
            tracing::warn!(
                accessory = %settings.name,
                "openTime is not required but recommended, obstruction detection is disabled"
            );
        }

        let handle = GarageDoorHandle {
            id,
            name: settings.name.clone(),
            information: AccessoryInformation::default(),
            commands: command_tx,
            snapshot: snapshot_rx,
        };

        let adapter = Self {
            id,
            settings,
            registry,
            publisher,
            door,
            status,
            snapshot_tx,
            commands,
            timer_tx,
            timer_rx,
        };

        (adapter, handle)
    }

    async fn run(mut self) {
        tracing::info!(
            accessory = %self.settings.name,
            delay = ?self.settings.init_delay,
            "activation scheduled"
        );
        tokio::time::sleep(self.settings.init_delay).await;

        match self.activate().await {
            Ok(wiring) => {
                self.status = AccessoryStatus::Active;
                self.publish_snapshot();
                self.emit(EventType::Activated, serde_json::json!({})).await;
                tracing::info!(accessory = %self.settings.name, "activation finished");
                self.serve(wiring).await;
            }
            Err(err) => {
                tracing::warn!(accessory = %self.settings.name, %err, "activation aborted");
                self.status = AccessoryStatus::Failed;
                self.publish_snapshot();
                self.emit(
                    EventType::ActivationFailed,
                    serde_json::json!({ "reason": err.to_string() }),
                )
                .await;
            }
        }
    }

    async fn activate(&mut self) -> Result<Wiring, ActivationError> {
        tracing::info!(accessory = %self.settings.name, "activation started");

        let switch = resolver::resolve(
            &self.registry,
            "switch",
            &self.settings.switch_service_name,
            &self.settings.switch_characteristic_name,
        )
        .await?;
        let sensor = resolver::resolve(
            &self.registry,
            "sensor",
            &self.settings.sensor_service_name,
            &self.settings.sensor_characteristic_name,
        )
        .await?;

        tracing::info!(
            accessory = %self.settings.name,
            "starting monitoring of switch and sensor services"
        );
        let updates = self
            .registry
            .monitor()
            .await
            .map_err(ActivationError::Registry)?;

        let reading = self.read_sensor(&sensor).await;
        match reading.flag(&self.settings.sensor_characteristic_name) {
            Ok(open) => {
                let before = self.door.snapshot();
                self.door.sync(open);
                self.apply(before).await;
                tracing::info!(
                    accessory = %self.settings.name,
                    state = %self.door.current_state(),
                    "current garage state synchronised"
                );
            }
            Err(err) => {
                tracing::warn!(
                    accessory = %self.settings.name,
                    %err,
                    "unable to read initial sensor state"
                );
            }
        }

        Ok(Wiring {
            switch,
            sensor,
            updates,
        })
    }

    async fn serve(&mut self, wiring: Wiring) {
        let Wiring {
            switch,
            sensor,
            mut updates,
        } = wiring;
        let mut monitoring = true;

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::SetTarget { target, ack }) => {
                        self.on_command(&switch, target).await;
                        let _ = ack.send(());
                    }
                    None => break,
                },
                Some(transition) = self.timer_rx.recv() => {
                    self.on_timer_expired(transition).await;
                }
                batch = updates.recv(), if monitoring => match batch {
                    Some(batch) => self.dispatch(&switch, &sensor, batch).await,
                    None => {
                        tracing::warn!(accessory = %self.settings.name, "remote monitor closed, sensor updates stopped");
                        monitoring = false;
                    }
                },
            }
        }

        tracing::debug!(accessory = %self.settings.name, "all handles dropped, accessory stopped");
    }

    async fn on_command(&mut self, switch: &RemoteService, target: TargetDoorState) {
        let before = self.door.snapshot();
        let transition = self.door.on_command(target);

        match target {
            TargetDoorState::Open => tracing::info!(accessory = %self.settings.name, "opening"),
            TargetDoorState::Closed => tracing::info!(accessory = %self.settings.name, "closing"),
        }

        self.pulse(switch);
        if let Some(open_time) = self.settings.open_time {
            self.start_timer(open_time, transition);
        }
        self.apply(before).await;
    }

    /// Fire-and-forget write of the pulse value to the switch.
    fn pulse(&self, switch: &RemoteService) {
        let registry = self.registry.clone();
        let service = switch.clone();
        let characteristic = self.settings.switch_characteristic_name.clone();
        let accessory = self.settings.name.clone();

        tokio::spawn(async move {
            match registry.set_characteristic(&service, &characteristic, PULSE).await {
                Ok(()) => tracing::debug!(accessory = %accessory, "switch pulsed"),
                Err(err) => tracing::warn!(accessory = %accessory, %err, "unable to pulse switch"),
            }
        });
    }

    fn start_timer(&self, open_time: Duration, transition: Transition) {
        let timer_tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(open_time).await;
            let _ = timer_tx.send(transition);
        });
    }

    async fn on_timer_expired(&mut self, transition: Transition) {
        let before = self.door.snapshot();
        if !self.door.on_timer_expired(transition) {
            tracing::debug!(
                accessory = %self.settings.name,
                transition = transition.id,
                "ignoring timer of a superseded command"
            );
            return;
        }
        if self.door.obstructed() {
            tracing::warn!(
                accessory = %self.settings.name,
                expected = %transition.expected,
                state = %self.door.current_state(),
                "door did not reach its target in time, obstruction detected"
            );
        }
        self.apply(before).await;
    }

    /// Fetch the sensor again once monitoring runs, so the initial sync is
    /// never older than the monitor's baseline. Falls back to the resolved
    /// snapshot when the hub cannot be read.
    async fn read_sensor(&self, resolved: &RemoteService) -> RemoteService {
        match self.registry.list_services().await {
            Ok(services) => services
                .into_iter()
                .find(|service| service.is_same(resolved))
                .unwrap_or_else(|| resolved.clone()),
            Err(err) => {
                tracing::warn!(
                    accessory = %self.settings.name,
                    %err,
                    "unable to refresh sensor state, using resolved value"
                );
                resolved.clone()
            }
        }
    }

    /// Process one batch of hub updates; a failing entry never stops the rest.
    async fn dispatch(
        &mut self,
        switch: &RemoteService,
        sensor: &RemoteService,
        batch: ServiceUpdates,
    ) {
        for service in batch {
            if let Err(err) = self.on_service_update(switch, sensor, &service).await {
                tracing::error!(
                    accessory = %self.settings.name,
                    service = %service.service_name,
                    %err,
                    "failed to process service update"
                );
            }
        }
    }

    async fn on_service_update(
        &mut self,
        switch: &RemoteService,
        sensor: &RemoteService,
        service: &RemoteService,
    ) -> Result<(), GarageError> {
        if service.is_same(switch) {
            return Ok(());
        }
        if !service.is_named(&sensor.service_name) {
            return Ok(());
        }

        let open = service.flag(&self.settings.sensor_characteristic_name)?;
        let before = self.door.snapshot();
        self.door.on_sensor_change(open);
        tracing::debug!(accessory = %self.settings.name, state = %self.door.current_state(), "sensor update");
        self.apply(before).await;
        Ok(())
    }

    /// Publish the new snapshot and one event per changed characteristic.
    async fn apply(&mut self, before: DoorSnapshot) {
        let after = self.door.snapshot();
        self.publish_snapshot();

        if before.current != after.current {
            self.emit(
                EventType::CurrentDoorStateChanged,
                serde_json::json!({ "from": before.current, "to": after.current }),
            )
            .await;
        }
        if before.target != after.target {
            self.emit(
                EventType::TargetDoorStateChanged,
                serde_json::json!({ "from": before.target, "to": after.target }),
            )
            .await;
        }
        if before.obstructed != after.obstructed {
            self.emit(
                EventType::ObstructionChanged,
                serde_json::json!({ "from": before.obstructed, "to": after.obstructed }),
            )
            .await;
        }
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(AccessorySnapshot::new(
            self.id,
            &self.settings.name,
            self.status,
            self.door.snapshot(),
        ));
    }

    async fn emit(&self, event_type: EventType, data: serde_json::Value) {
        let event = Event::new(event_type, self.id, &self.settings.name, data);
        if let Err(err) = self.publisher.publish(event).await {
            tracing::warn!(accessory = %self.settings.name, %err, "failed to publish event");
        }
    }
}

/// Cheap, cloneable access to one running accessory.
///
/// This is what the host surface talks to: reads are served from the latest
/// snapshot, commands are queued to the accessory task.
#[derive(Clone)]
pub struct GarageDoorHandle {
    id: AccessoryId,
    name: String,
    information: AccessoryInformation,
    commands: mpsc::Sender<Command>,
    snapshot: watch::Receiver<AccessorySnapshot>,
}

impl GarageDoorHandle {
    #[must_use]
    pub fn id(&self) -> AccessoryId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn information(&self) -> &AccessoryInformation {
        &self.information
    }

    #[must_use]
    pub fn snapshot(&self) -> AccessorySnapshot {
        self.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> AccessoryStatus {
        self.snapshot.borrow().status
    }

    #[must_use]
    pub fn current_state(&self) -> DoorState {
        self.snapshot.borrow().current_door_state
    }

    /// Pure read of the target state; no side effect.
    #[must_use]
    pub fn target_state(&self) -> TargetDoorState {
        self.snapshot.borrow().target_door_state
    }

    #[must_use]
    pub fn obstructed(&self) -> bool {
        self.snapshot.borrow().obstruction_detected
    }

    /// Ask the door to move towards `target`.
    ///
    /// Resolves once the accessory entered the transitional state and the
    /// switch pulse was issued; it does not wait for the hub to acknowledge
    /// the write.
    ///
    /// # Errors
    ///
    /// Returns [`GarageError::NotReady`] while the accessory is pending or
    /// after its activation failed.
    pub async fn set_target(&self, target: TargetDoorState) -> Result<(), GarageError> {
        let status = self.status();
        if !status.is_active() {
            return Err(self.not_ready(status));
        }

        let (ack, acked) = oneshot::channel();
        self.commands
            .send(Command::SetTarget { target, ack })
            .await
            .map_err(|_| self.not_ready(AccessoryStatus::Failed))?;
        acked
            .await
            .map_err(|_| self.not_ready(AccessoryStatus::Failed))
    }

    /// Log an identification request.
    pub fn identify(&self) {
        tracing::info!(accessory = %self.name, "identify requested");
    }

    /// Wait until activation finished, successfully or not.
    pub async fn settled(&self) -> AccessoryStatus {
        let mut snapshot = self.snapshot.clone();
        match snapshot.wait_for(|s| s.status != AccessoryStatus::Pending).await {
            Ok(current) => current.status,
            Err(_) => self.status(),
        }
    }

    fn not_ready(&self, status: AccessoryStatus) -> GarageError {
        NotReadyError {
            accessory: self.name.clone(),
            status: status.to_string(),
        }
        .into()
    }
}

impl std::fmt::Debug for GarageDoorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GarageDoorHandle")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_bus::InProcessEventBus;
    use garage_bridge_domain::door::TimerPolicy;
    use garage_bridge_domain::remote::RemoteCharacteristic;
    use std::sync::{Arc, Mutex};

    const OPEN_TIME: Duration = Duration::from_secs(10);

    type WriteLog = (String, String, CharacteristicValue);

    #[derive(Clone)]
    struct StubHub {
        services: Arc<Mutex<Vec<RemoteService>>>,
        writes: Arc<Mutex<Vec<WriteLog>>>,
        updates: Arc<Mutex<Option<mpsc::Receiver<ServiceUpdates>>>>,
        on_monitor: Arc<Mutex<Option<Vec<RemoteService>>>>,
    }

    impl StubHub {
        fn new(services: Vec<RemoteService>) -> (Self, mpsc::Sender<ServiceUpdates>) {
            let (tx, rx) = mpsc::channel(8);
            let hub = Self {
                services: Arc::new(Mutex::new(services)),
                writes: Arc::new(Mutex::new(Vec::new())),
                updates: Arc::new(Mutex::new(Some(rx))),
                on_monitor: Arc::new(Mutex::new(None)),
            };
            (hub, tx)
        }

        fn writes(&self) -> Vec<WriteLog> {
            self.writes.lock().unwrap().clone()
        }

        /// Replace the hub contents as soon as the accessory subscribes.
        fn change_on_monitor(&self, services: Vec<RemoteService>) {
            *self.on_monitor.lock().unwrap() = Some(services);
        }
    }

    impl RemoteRegistry for StubHub {
        async fn list_services(&self) -> Result<Vec<RemoteService>, GarageError> {
            Ok(self.services.lock().unwrap().clone())
        }

        async fn set_characteristic(
            &self,
            service: &RemoteService,
            characteristic: &str,
            value: CharacteristicValue,
        ) -> Result<(), GarageError> {
            self.writes.lock().unwrap().push((
                service.service_name.clone(),
                characteristic.to_string(),
                value,
            ));
            Ok(())
        }

        async fn monitor(&self) -> Result<mpsc::Receiver<ServiceUpdates>, GarageError> {
            if let Some(services) = self.on_monitor.lock().unwrap().take() {
                *self.services.lock().unwrap() = services;
            }
            self.updates
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| GarageError::Remote("already monitored".into()))
        }
    }

    fn switch_service(on: i64) -> RemoteService {
        RemoteService {
            aid: 2,
            iid: 9,
            kind: "Switch".to_string(),
            service_name: "Garage Switch".to_string(),
            characteristics: vec![RemoteCharacteristic {
                iid: 10,
                kind: "On".to_string(),
                description: "On".to_string(),
                value: CharacteristicValue::Int(on),
            }],
        }
    }

    fn sensor_service(value: CharacteristicValue) -> RemoteService {
        RemoteService {
            aid: 3,
            iid: 9,
            kind: "ContactSensor".to_string(),
            service_name: "Garage Sensor".to_string(),
            characteristics: vec![RemoteCharacteristic {
                iid: 10,
                kind: "ContactSensorState".to_string(),
                description: "Contact Sensor State".to_string(),
                value,
            }],
        }
    }

    fn settings(open_time: Option<Duration>) -> GarageDoorSettings {
        GarageDoorSettings {
            name: "Garage".to_string(),
            switch_service_name: "Garage Switch".to_string(),
            switch_characteristic_name: "On".to_string(),
            sensor_service_name: "Garage Sensor".to_string(),
            sensor_characteristic_name: "ContactSensorState".to_string(),
            open_time,
            hap_client_pin: "031-45-154".to_string(),
            init_delay: Duration::from_millis(100),
            timer_policy: TimerPolicy::EvaluateAll,
        }
    }

    async fn active_door(
        open_time: Option<Duration>,
    ) -> (GarageDoorHandle, StubHub, mpsc::Sender<ServiceUpdates>) {
        let (hub, updates) = StubHub::new(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(0)),
        ]);
        let bus = Arc::new(InProcessEventBus::new(64));
        let handle = GarageDoorAdapter::start(settings(open_time), hub.clone(), bus);
        assert_eq!(handle.settled().await, AccessoryStatus::Active);
        (handle, hub, updates)
    }

    /// Let spawned tasks and the accessory loop drain their queues.
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn should_be_closed_and_pending_before_activation() {
        let (hub, _updates) = StubHub::new(vec![]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub, bus);

        assert_eq!(handle.status(), AccessoryStatus::Pending);
        assert_eq!(handle.current_state(), DoorState::Closed);
        assert_eq!(handle.target_state(), TargetDoorState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn should_reject_commands_before_activation() {
        let (hub, _updates) = StubHub::new(vec![]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub, bus);

        let result = handle.set_target(TargetDoorState::Open).await;
        assert!(matches!(result, Err(GarageError::NotReady(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn should_fail_activation_when_switch_is_missing() {
        let (hub, _updates) = StubHub::new(vec![sensor_service(CharacteristicValue::Int(0))]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub.clone(), bus);

        assert_eq!(handle.settled().await, AccessoryStatus::Failed);
        let result = handle.set_target(TargetDoorState::Open).await;
        assert!(matches!(result, Err(GarageError::NotReady(_))));
        assert!(hub.writes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_fail_activation_when_sensor_characteristic_is_missing() {
        let mut sensor = sensor_service(CharacteristicValue::Int(0));
        sensor.characteristics[0].kind = "MotionDetected".to_string();
        let (hub, _updates) = StubHub::new(vec![switch_service(0), sensor]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub, bus);

        assert_eq!(handle.settled().await, AccessoryStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn should_sync_state_from_sensor_on_activation() {
        let (hub, _updates) = StubHub::new(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(1)),
        ]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub, bus);

        assert_eq!(handle.settled().await, AccessoryStatus::Active);
        assert_eq!(handle.current_state(), DoorState::Open);
        assert_eq!(handle.target_state(), TargetDoorState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn should_enter_opening_and_pulse_switch_when_commanded_open() {
        let (handle, hub, _updates) = active_door(None).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        assert_eq!(handle.current_state(), DoorState::Opening);
        assert_eq!(handle.target_state(), TargetDoorState::Open);
        assert!(!handle.obstructed());

        settle().await;
        assert_eq!(
            hub.writes(),
            vec![(
                "Garage Switch".to_string(),
                "On".to_string(),
                CharacteristicValue::Int(1)
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_enter_closing_when_commanded_closed() {
        let (handle, _hub, _updates) = active_door(None).await;

        handle.set_target(TargetDoorState::Closed).await.unwrap();
        assert_eq!(handle.current_state(), DoorState::Closing);
        assert!(!handle.obstructed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_flag_obstruction_when_sensor_never_confirms() {
        let (handle, _hub, _updates) = active_door(Some(OPEN_TIME)).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        tokio::time::sleep(OPEN_TIME + Duration::from_millis(1)).await;

        assert!(handle.obstructed());
        assert_eq!(handle.current_state(), DoorState::Opening);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_flag_obstruction_when_sensor_confirms_in_time() {
        let (handle, _hub, updates) = active_door(Some(OPEN_TIME)).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        updates
            .send(vec![sensor_service(CharacteristicValue::Int(1))])
            .await
            .unwrap();
        tokio::time::sleep(OPEN_TIME + Duration::from_millis(1)).await;

        assert!(!handle.obstructed());
        assert_eq!(handle.current_state(), DoorState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_start_timer_without_open_time() {
        let (handle, _hub, _updates) = active_door(None).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert!(!handle.obstructed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_override_transitional_state_on_sensor_change() {
        let (handle, _hub, updates) = active_door(None).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        updates
            .send(vec![sensor_service(CharacteristicValue::Bool(false))])
            .await
            .unwrap();
        settle().await;

        assert_eq!(handle.current_state(), DoorState::Closed);
        assert!(!handle.obstructed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_sync_from_sensor_read_after_subscribing() {
        let (hub, _updates) = StubHub::new(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(0)),
        ]);
        hub.change_on_monitor(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(1)),
        ]);
        let bus = Arc::new(InProcessEventBus::new(16));
        let handle = GarageDoorAdapter::start(settings(None), hub, bus);

        assert_eq!(handle.settled().await, AccessoryStatus::Active);
        assert_eq!(handle.current_state(), DoorState::Open);
        assert_eq!(handle.target_state(), TargetDoorState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_switch_updates_sharing_sensor_name() {
        let mut switch = switch_service(0);
        switch.service_name = "Garage".to_string();
        let mut sensor = sensor_service(CharacteristicValue::Int(0));
        sensor.service_name = "Garage".to_string();
        let (hub, updates) = StubHub::new(vec![switch.clone(), sensor]);
        let bus = Arc::new(InProcessEventBus::new(64));
        let mut settings = settings(Some(OPEN_TIME));
        settings.switch_service_name = "Garage".to_string();
        settings.sensor_service_name = "Garage".to_string();
        let handle = GarageDoorAdapter::start(settings, hub, bus);
        assert_eq!(handle.settled().await, AccessoryStatus::Active);

        handle.set_target(TargetDoorState::Open).await.unwrap();
        tokio::time::sleep(OPEN_TIME + Duration::from_millis(1)).await;
        assert!(handle.obstructed());

        switch.characteristics.push(RemoteCharacteristic {
            iid: 11,
            kind: "ContactSensorState".to_string(),
            description: "Contact Sensor State".to_string(),
            value: CharacteristicValue::Int(0),
        });
        updates.send(vec![switch]).await.unwrap();
        settle().await;

        assert!(handle.obstructed());
        assert_eq!(handle.current_state(), DoorState::Opening);
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_unrelated_services() {
        let (handle, _hub, updates) = active_door(None).await;

        let mut other = sensor_service(CharacteristicValue::Int(1));
        other.service_name = "Back Door".to_string();
        updates.send(vec![other]).await.unwrap();
        settle().await;

        assert_eq!(handle.current_state(), DoorState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_processing_batch_after_failing_entry() {
        let (handle, _hub, updates) = active_door(None).await;

        let mut broken = sensor_service(CharacteristicValue::Int(1));
        broken.characteristics.clear();
        updates
            .send(vec![
                broken,
                sensor_service(CharacteristicValue::String("garbage".into())),
                switch_service(1),
                sensor_service(CharacteristicValue::Int(1)),
            ])
            .await
            .unwrap();
        settle().await;

        assert_eq!(handle.current_state(), DoorState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn should_publish_events_for_changed_characteristics() {
        let (hub, _updates) = StubHub::new(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(0)),
        ]);
        let bus = Arc::new(InProcessEventBus::new(64));
        let mut events = bus.subscribe();
        let handle = GarageDoorAdapter::start(settings(None), hub, Arc::clone(&bus));
        handle.settled().await;

        handle.set_target(TargetDoorState::Open).await.unwrap();

        let activated = events.recv().await.unwrap();
        assert_eq!(activated.event_type, EventType::Activated);
        let current = events.recv().await.unwrap();
        assert_eq!(current.event_type, EventType::CurrentDoorStateChanged);
        assert_eq!(current.data["to"], "opening");
        let target = events.recv().await.unwrap();
        assert_eq!(target.event_type, EventType::TargetDoorStateChanged);
        assert_eq!(target.data["to"], "open");
    }

    #[tokio::test(start_paused = true)]
    async fn should_let_superseded_timer_judge_current_state() {
        let (handle, _hub, updates) = active_door(Some(OPEN_TIME)).await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        tokio::time::sleep(OPEN_TIME / 2).await;
        handle.set_target(TargetDoorState::Closed).await.unwrap();
        updates
            .send(vec![sensor_service(CharacteristicValue::Int(0))])
            .await
            .unwrap();

        // the first ("open") timer fires against a closed door
        tokio::time::sleep(OPEN_TIME / 2 + Duration::from_millis(1)).await;
        assert!(handle.obstructed());

        // the second ("closed") timer clears it again
        tokio::time::sleep(OPEN_TIME / 2).await;
        assert!(!handle.obstructed());
    }

    #[tokio::test(start_paused = true)]
    async fn should_ignore_superseded_timer_when_configured() {
        let (hub, updates) = StubHub::new(vec![
            switch_service(0),
            sensor_service(CharacteristicValue::Int(0)),
        ]);
        let bus = Arc::new(InProcessEventBus::new(64));
        let mut settings = settings(Some(OPEN_TIME));
        settings.timer_policy = TimerPolicy::IgnoreSuperseded;
        let handle = GarageDoorAdapter::start(settings, hub, bus);
        handle.settled().await;

        handle.set_target(TargetDoorState::Open).await.unwrap();
        tokio::time::sleep(OPEN_TIME / 2).await;
        handle.set_target(TargetDoorState::Closed).await.unwrap();
        updates
            .send(vec![sensor_service(CharacteristicValue::Int(0))])
            .await
            .unwrap();

        tokio::time::sleep(OPEN_TIME / 2 + Duration::from_millis(1)).await;
        assert!(!handle.obstructed());
    }
}
