use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct SlotBookedEvent {
    pub slot_id: Uuid,
    pub car_id: Uuid,
    pub booking_id: Uuid,
    pub booked_at: i64,
}
