//! Wall-clock timestamps carried by events.

use chrono::{DateTime, Utc};

/// UTC timestamp of an [`Event`](crate::event::Event).
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_serialize_as_rfc3339() {
        let ts = now();
        let json = serde_json::to_value(ts).unwrap();
        let parsed: Timestamp = json.as_str().unwrap().parse().unwrap();
        assert_eq!(parsed, ts);
    }
}
