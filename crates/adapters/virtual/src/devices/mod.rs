//! Virtual device implementations: momentary switch, contact sensor, and
//! the door that ties them together.

mod sensor;
mod switch;

pub use sensor::VirtualContactSensor;
pub use switch::VirtualSwitch;

use garage_bridge_domain::remote::RemoteService;

/// A simulated garage door: a switch that starts it and a sensor that sees it.
///
/// While the door travels, further pulses are ignored.
pub struct VirtualDoor {
    pub switch: VirtualSwitch,
    pub sensor: VirtualContactSensor,
    pub jammed: bool,
    pub moving: bool,
}

impl VirtualDoor {
    #[must_use]
    pub fn new(aid: u64, switch_name: &str, sensor_name: &str, jammed: bool) -> Self {
        Self {
            switch: VirtualSwitch::new(aid, switch_name),
            sensor: VirtualContactSensor::new(aid + 1, sensor_name, false),
            jammed,
            moving: false,
        }
    }

    /// Both services, switch first.
    #[must_use]
    pub fn services(&self) -> [RemoteService; 2] {
        [self.switch.service(), self.sensor.service()]
    }

    /// Whether a pulse now should set the door in motion.
    #[must_use]
    pub fn can_move(&self) -> bool {
        !self.jammed && !self.moving
    }

    /// End of travel: flip the contact and return the updated sensor service.
    pub fn finish_travel(&mut self) -> RemoteService {
        self.moving = false;
        let open = !self.sensor.is_open();
        self.sensor.set_open(open);
        self.sensor.service()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_place_sensor_on_next_aid() {
        let door = VirtualDoor::new(2, "Relay", "Reed", false);
        let [switch, sensor] = door.services();
        assert_eq!(switch.aid, 2);
        assert_eq!(sensor.aid, 3);
    }

    #[test]
    fn should_not_move_when_jammed() {
        let door = VirtualDoor::new(2, "Relay", "Reed", true);
        assert!(!door.can_move());
    }

    #[test]
    fn should_flip_contact_when_travel_finishes() {
        let mut door = VirtualDoor::new(2, "Relay", "Reed", false);
        door.moving = true;
        let sensor = door.finish_travel();
        assert!(sensor.flag("ContactSensorState").unwrap());
        assert!(door.can_move());
    }
}
