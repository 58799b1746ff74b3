//! Hand-off contracts with the published-inventory collaborator

use serde::{Deserialize, Serialize};

use crate::entities::arrival::{ArrivalRecord, FuelType, VehicleCategory};

/// Base descriptive fields received when an arrival is seeded from an
/// already-published asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyAsset {
    pub vin: String,
    pub lot_number: String,
    pub year: Option<u16>,
    pub make: String,
    pub model: String,
    pub trim: String,
    pub color: String,
    pub category: VehicleCategory,
    pub fuel_type: FuelType,
    pub price: f64,
}

/// Base descriptive fields written out when an arrival is promoted into the
/// published inventory
///
/// Write-only hand-off: the dispatch core never reads inventory state back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedVehicle {
    pub vin: String,
    pub lot_number: String,
    pub year: Option<u16>,
    pub make: String,
    pub model: String,
    pub trim: String,
    pub color: String,
    pub category: VehicleCategory,
    pub fuel_type: FuelType,
    pub price: f64,
    pub images: Vec<String>,
}

impl From<&ArrivalRecord> for PublishedVehicle {
    fn from(record: &ArrivalRecord) -> Self {
        Self {
            vin: record.vin.clone(),
            lot_number: record.lot_number.clone(),
            year: record.year,
            make: record.make.clone(),
            model: record.model.clone(),
            trim: record.trim.clone(),
            color: record.color.clone(),
            category: record.category,
            fuel_type: record.fuel_type,
            price: record.price,
            images: record.images.clone(),
        }
    }
}
