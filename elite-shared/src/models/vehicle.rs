use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vehicle on the showroom floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub category: String,
    /// List price in whole currency units
    pub price: i64,
    pub specs: VehicleSpecs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpecs {
    pub hp: i32,
    pub engine: String,
}

impl Vehicle {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        category: impl Into<String>,
        price: i64,
        specs: VehicleSpecs,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            brand: brand.into(),
            model: model.into(),
            year,
            category: category.into(),
            price,
            specs,
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_wire_format() {
        let car = Vehicle::new(
            "Porsche",
            "911 GT3 RS",
            2024,
            "GT",
            241_300,
            VehicleSpecs { hp: 518, engine: "4.0L Flat-6".to_string() },
        );
        let json = serde_json::to_value(&car).unwrap();

        assert_eq!(json["_id"], car.id.to_string());
        assert_eq!(json["brand"], "Porsche");
        assert_eq!(json["specs"]["hp"], 518);
        assert!(json.get("id").is_none());
        assert_eq!(car.display_name(), "Porsche 911 GT3 RS");
    }
}
