use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::Vehicle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub car_id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    pub cost: i64,
    pub next_service_due: bool,
}

/// A service record flagged as due, joined with its vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAlert {
    #[serde(flatten)]
    pub record: ServiceRecord,
    pub car_details: Option<Vehicle>,
}
