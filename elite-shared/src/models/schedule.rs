use chrono::{DateTime, Duration, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Open => "open",
            SlotStatus::Booked => "booked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(SlotStatus::Open),
            "booked" => Some(SlotStatus::Booked),
            _ => None,
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable viewing window for exactly one vehicle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Slot {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub car_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: SlotStatus,
}

impl Slot {
    pub fn open(car_id: Uuid, start_time: DateTime<Utc>, length: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            car_id,
            start_time,
            end_time: start_time + length,
            status: SlotStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == SlotStatus::Open
    }
}

// `is_available` is derived from the status so clients reading the older
// field keep working.
impl Serialize for Slot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Slot", 6)?;
        state.serialize_field("_id", &self.id)?;
        state.serialize_field("car_id", &self.car_id)?;
        state.serialize_field("start_time", &self.start_time)?;
        state.serialize_field("end_time", &self.end_time)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("is_available", &self.is_open())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slot_serializes_availability() {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
        let mut slot = Slot::open(Uuid::new_v4(), start, Duration::hours(1));

        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["status"], "open");
        assert_eq!(json["is_available"], true);
        assert_eq!(json["end_time"], "2025-06-01T11:00:00Z");

        slot.status = SlotStatus::Booked;
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["status"], "booked");
        assert_eq!(json["is_available"], false);

        let back: Slot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(SlotStatus::parse("open"), Some(SlotStatus::Open));
        assert_eq!(SlotStatus::parse("booked"), Some(SlotStatus::Booked));
        assert_eq!(SlotStatus::parse("held"), None);
    }
}
