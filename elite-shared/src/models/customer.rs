use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::pii::Masked;

/// A showroom customer. Loyalty tier is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub phone: Masked<String>,
    pub loyalty_tier: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, phone: &str, loyalty_tier: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: Masked::from(phone),
            loyalty_tier: loyalty_tier.into(),
        }
    }
}
