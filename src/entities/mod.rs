//! Entity type definitions

pub mod arrival;
pub mod handoff;

pub use arrival::ArrivalRecord;
pub use handoff::{PublishedVehicle, ReadyAsset};
