use serde::Deserialize;
use uuid::Uuid;
use crate::coordinator::BookingError;

/// Raw body of `POST /api/book-test-drive`
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TestDriveRequest {
    pub customer_id: Option<String>,
    pub car_id: Option<String>,
    pub slot_id: Option<String>,
}

/// A validated booking attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub slot_id: Uuid,
}

impl BookingRequest {
    pub fn new(customer_id: Uuid, car_id: Uuid, slot_id: Uuid) -> Self {
        Self { customer_id, car_id, slot_id }
    }
}

impl TryFrom<TestDriveRequest> for BookingRequest {
    type Error = BookingError;

    fn try_from(raw: TestDriveRequest) -> Result<Self, Self::Error> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !(present(&raw.customer_id) && present(&raw.car_id) && present(&raw.slot_id)) {
            return Err(BookingError::Validation("Missing required fields".to_string()));
        }

        Ok(Self {
            customer_id: parse_id("customer_id", raw.customer_id.as_deref().unwrap_or_default())?,
            car_id: parse_id("car_id", raw.car_id.as_deref().unwrap_or_default())?,
            slot_id: parse_id("slot_id", raw.slot_id.as_deref().unwrap_or_default())?,
        })
    }
}

/// Parse an identifier taken from a request, naming the field on failure
pub fn parse_id(field: &str, value: &str) -> Result<Uuid, BookingError> {
    Uuid::parse_str(value.trim())
        .map_err(|_| BookingError::Validation(format!("Invalid {}: '{}'", field, value)))
}
