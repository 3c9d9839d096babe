//! Garage door state machine.
//!
//! [`GarageDoor`] holds the composite state of the virtual opener: the
//! current door position, the requested target, and the obstruction flag.
//! After activation, state only moves through three entry points:
//!
//! - [`on_command`](GarageDoor::on_command): a user asked to open or close;
//!   the door optimistically enters `Opening`/`Closing`.
//! - [`on_sensor_change`](GarageDoor::on_sensor_change): the contact sensor
//!   reported; this is ground truth and overrides any transitional state.
//! - [`on_timer_expired`](GarageDoor::on_timer_expired): the open/close
//!   window of a command elapsed; only the obstruction flag is adjusted.
//!
//! [`sync`](GarageDoor::sync) seeds current and target once, from the first
//! sensor reading after activation.

use serde::{Deserialize, Serialize};

/// Position of the door as exposed through `CurrentDoorState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    Closed,
    Opening,
    Closing,
}

impl DoorState {
    /// Map a contact reading to a terminal state (`true` means "not closed").
    #[must_use]
    pub fn from_contact(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    /// HAP numeric code of the `CurrentDoorState` characteristic.
    #[must_use]
    pub fn hap_code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
            Self::Opening => 2,
            Self::Closing => 3,
        }
    }
}

impl std::fmt::Display for DoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
            Self::Opening => f.write_str("opening"),
            Self::Closing => f.write_str("closing"),
        }
    }
}

/// Requested position as exposed through `TargetDoorState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetDoorState {
    Open,
    Closed,
}

impl TargetDoorState {
    /// Map a contact reading to a target (`true` means "not closed").
    #[must_use]
    pub fn from_contact(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    /// HAP numeric code of the `TargetDoorState` characteristic.
    #[must_use]
    pub fn hap_code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Closed => 1,
        }
    }

    /// The state the door is in while travelling towards this target.
    #[must_use]
    pub fn transitional(self) -> DoorState {
        match self {
            Self::Open => DoorState::Opening,
            Self::Closed => DoorState::Closing,
        }
    }

    /// The state the door is in once it reached this target.
    #[must_use]
    pub fn terminal(self) -> DoorState {
        match self {
            Self::Open => DoorState::Open,
            Self::Closed => DoorState::Closed,
        }
    }
}

impl std::fmt::Display for TargetDoorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.terminal().fmt(f)
    }
}

/// A commanded transition, carried by its obstruction timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Monotonic id; every command mints a new one.
    pub id: u64,
    /// Terminal state the command is expected to reach.
    pub expected: DoorState,
}

/// How a timer that belongs to a superseded command is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPolicy {
    /// Every timer re-evaluates the current state against its own expected
    /// state, even when a later command superseded it.
    #[default]
    EvaluateAll,
    /// Timers of superseded commands are ignored.
    IgnoreSuperseded,
}

/// Read-only view of a [`GarageDoor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorSnapshot {
    pub current: DoorState,
    pub target: TargetDoorState,
    pub obstructed: bool,
}

/// Composite state of the virtual garage door opener.
#[derive(Debug, Clone)]
pub struct GarageDoor {
    current: DoorState,
    target: TargetDoorState,
    obstructed: bool,
    last_transition: u64,
    policy: TimerPolicy,
}

impl Default for GarageDoor {
    fn default() -> Self {
        Self::new(TimerPolicy::default())
    }
}

impl GarageDoor {
    /// A closed door with no obstruction.
    #[must_use]
    pub fn new(policy: TimerPolicy) -> Self {
        Self {
            current: DoorState::Closed,
            target: TargetDoorState::Closed,
            obstructed: false,
            last_transition: 0,
            policy,
        }
    }

    #[must_use]
    pub fn current_state(&self) -> DoorState {
        self.current
    }

    #[must_use]
    pub fn target_state(&self) -> TargetDoorState {
        self.target
    }

    #[must_use]
    pub fn obstructed(&self) -> bool {
        self.obstructed
    }

    #[must_use]
    pub fn snapshot(&self) -> DoorSnapshot {
        DoorSnapshot {
            current: self.current,
            target: self.target,
            obstructed: self.obstructed,
        }
    }

    /// Align current and target with a sensor reading taken at activation.
    pub fn sync(&mut self, open: bool) {
        self.current = DoorState::from_contact(open);
        self.target = TargetDoorState::from_contact(open);
    }

    /// Start a commanded transition towards `target`.
    ///
    /// Returns the [`Transition`] the caller should hand to the obstruction
    /// timer, if one is configured.
    pub fn on_command(&mut self, target: TargetDoorState) -> Transition {
        self.last_transition += 1;
        self.target = target;
        self.current = target.transitional();
        self.obstructed = false;

        Transition {
            id: self.last_transition,
            expected: target.terminal(),
        }
    }

    /// Apply an authoritative contact reading (`true` means "not closed").
    pub fn on_sensor_change(&mut self, open: bool) {
        self.current = DoorState::from_contact(open);
        self.obstructed = false;
    }

    /// Evaluate the obstruction flag once the window of `transition` elapsed.
    ///
    /// Returns `false` when the firing was ignored by the [`TimerPolicy`].
    pub fn on_timer_expired(&mut self, transition: Transition) -> bool {
        if self.policy == TimerPolicy::IgnoreSuperseded && transition.id != self.last_transition {
            return false;
        }
        self.obstructed = self.current != transition.expected;
        true
    }
}
