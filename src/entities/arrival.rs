//! Arrival entity type - a vehicle tracked through the intake pipeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{ArrivalId, DocumentId};
use crate::core::status::ArrivalStatus;

/// Body style of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    #[default]
    Sedan,
    Suv,
    Truck,
    Van,
    Coupe,
    Hatchback,
    Wagon,
    Convertible,
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleCategory::Sedan => write!(f, "Sedan"),
            VehicleCategory::Suv => write!(f, "SUV"),
            VehicleCategory::Truck => write!(f, "Truck"),
            VehicleCategory::Van => write!(f, "Van"),
            VehicleCategory::Coupe => write!(f, "Coupe"),
            VehicleCategory::Hatchback => write!(f, "Hatchback"),
            VehicleCategory::Wagon => write!(f, "Wagon"),
            VehicleCategory::Convertible => write!(f, "Convertible"),
        }
    }
}

/// Fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FuelType {
    #[default]
    #[serde(rename = "GAS")]
    Gas,
    #[serde(rename = "HYB")]
    Hybrid,
    #[serde(rename = "ELEC")]
    Electric,
    #[serde(rename = "DIESEL")]
    Diesel,
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FuelType::Gas => write!(f, "GAS"),
            FuelType::Hybrid => write!(f, "HYB"),
            FuelType::Electric => write!(f, "ELEC"),
            FuelType::Diesel => write!(f, "DIESEL"),
        }
    }
}

/// Whether the title for a vehicle is on hand
///
/// `Tbo` means "to be obtained".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TitleStatus {
    Yes,
    #[default]
    No,
    Tbo,
}

impl TitleStatus {
    /// Next value in the compact-view toggle cycle: YES -> TBO -> NO -> YES
    pub fn cycled(self) -> Self {
        match self {
            TitleStatus::Yes => TitleStatus::Tbo,
            TitleStatus::Tbo => TitleStatus::No,
            TitleStatus::No => TitleStatus::Yes,
        }
    }
}

impl std::fmt::Display for TitleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleStatus::Yes => write!(f, "YES"),
            TitleStatus::No => write!(f, "NO"),
            TitleStatus::Tbo => write!(f, "TBO"),
        }
    }
}

/// Kind of title, meaningful only when the title is on hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    Clean,
    Salvage,
    Rebuild,
}

impl std::fmt::Display for TitleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TitleType::Clean => write!(f, "Clean"),
            TitleType::Salvage => write!(f, "Salvage"),
            TitleType::Rebuild => write!(f, "Rebuild"),
        }
    }
}

/// Destination facility for an arriving vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    #[default]
    MainLot,
    OverflowLot,
    ServiceCenter,
    BodyShop,
    AuctionYard,
}

impl Destination {
    /// All destination facilities
    pub fn all() -> &'static [Destination] {
        &[
            Destination::MainLot,
            Destination::OverflowLot,
            Destination::ServiceCenter,
            Destination::BodyShop,
            Destination::AuctionYard,
        ]
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::MainLot => write!(f, "Main Lot"),
            Destination::OverflowLot => write!(f, "Overflow Lot"),
            Destination::ServiceCenter => write!(f, "Service Center"),
            Destination::BodyShop => write!(f, "Body Shop"),
            Destination::AuctionYard => write!(f, "Auction Yard"),
        }
    }
}

/// Contact details for the selling party
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartyInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
}

fn default_driver() -> String {
    "TBD".to_string()
}

/// Transport arrangement for an arriving vehicle
///
/// `driver` is a transporter name from the reference registry, or "TBD"
/// while the assignment is still open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransporterInfo {
    pub driver: String,
    pub phone: String,
    pub address: String,
}

impl Default for TransporterInfo {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

/// Milestone dates along the dispatch pipeline
///
/// Each field is independently settable. Reaching a workflow status never
/// forces the corresponding date, and setting a date never moves the status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    pub purchase: Option<NaiveDate>,
    pub paid: Option<NaiveDate>,
    pub pickup: Option<NaiveDate>,
    pub delivery: Option<NaiveDate>,
    pub fixing: Option<NaiveDate>,
    pub ready: Option<NaiveDate>,
}

impl Timeline {
    /// The milestone date matching a dispatch status, for timeline
    /// highlighting
    pub fn milestone_for(&self, status: ArrivalStatus) -> Option<NaiveDate> {
        match status {
            ArrivalStatus::Pending => self.purchase,
            ArrivalStatus::Paid => self.paid,
            ArrivalStatus::PickedUp => self.pickup,
            ArrivalStatus::Delivered => self.delivery,
            ArrivalStatus::Fixing => self.fixing,
            ArrivalStatus::ReadyToSell => self.ready,
            ArrivalStatus::Sold => None,
        }
    }
}

/// Kind of paperwork attached to an arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Invoice,
    Title,
    Shipping,
    Customs,
    #[default]
    Other,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Invoice => write!(f, "Invoice"),
            DocumentKind::Title => write!(f, "Title"),
            DocumentKind::Shipping => write!(f, "Shipping"),
            DocumentKind::Customs => write!(f, "Customs"),
            DocumentKind::Other => write!(f, "Other"),
        }
    }
}

/// A document attached to an arrival
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,

    pub name: String,

    #[serde(default)]
    pub kind: DocumentKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub uri: String,
}

impl Document {
    /// Create a new document with a fresh id
    pub fn new(name: impl Into<String>, kind: DocumentKind, uri: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            name: name.into(),
            kind,
            date: None,
            uri: uri.into(),
        }
    }
}

/// Buyer details recorded when an arrival is sold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInfo {
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub sale_price: f64,
    pub sale_date: NaiveDate,
    pub sold_date: NaiveDate,
}

/// An arrival record - one vehicle in the intake pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalRecord {
    /// Unique identifier
    pub id: ArrivalId,

    /// Vehicle identification number
    #[serde(default)]
    pub vin: String,

    /// Dealer lot number
    #[serde(default)]
    pub lot_number: String,

    /// Model year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// Manufacturer name, drawn from the reference registry
    #[serde(default)]
    pub make: String,

    /// Model name, drawn from the reference registry
    #[serde(default)]
    pub model: String,

    /// Trim level
    #[serde(default)]
    pub trim: String,

    /// Exterior color, drawn from the reference registry
    #[serde(default)]
    pub color: String,

    /// Body style
    #[serde(default)]
    pub category: VehicleCategory,

    /// Fuel type
    #[serde(default)]
    pub fuel_type: FuelType,

    /// Whether the title is on hand
    #[serde(default)]
    pub title_status: TitleStatus,

    /// Kind of title, meaningful only when `title_status` is YES
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_type: Option<TitleType>,

    /// Whether keys came with the vehicle
    #[serde(default)]
    pub has_keys: bool,

    /// Purchase price
    #[serde(default)]
    pub price: f64,

    /// Destination facility
    #[serde(default)]
    pub destination: Destination,

    /// Workflow status
    #[serde(default)]
    pub status: ArrivalStatus,

    /// Selling party
    #[serde(default)]
    pub seller: PartyInfo,

    /// Transport arrangement
    #[serde(default)]
    pub transporter: TransporterInfo,

    /// Milestone dates
    #[serde(default)]
    pub timeline: Timeline,

    /// Image URIs, in upload order
    #[serde(default)]
    pub images: Vec<String>,

    /// Attached documents, in upload order
    #[serde(default)]
    pub documents: Vec<Document>,

    /// Buyer details once sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale: Option<SaleInfo>,

    /// Free-form notes
    #[serde(default)]
    pub notes: String,

    /// Creation timestamp
    pub created: DateTime<Utc>,
}

impl ArrivalRecord {
    /// Create a new arrival with default field values
    pub fn new(destination: Destination) -> Self {
        Self {
            id: ArrivalId::new(),
            vin: String::new(),
            lot_number: String::new(),
            year: None,
            make: String::new(),
            model: String::new(),
            trim: String::new(),
            color: String::new(),
            category: VehicleCategory::default(),
            fuel_type: FuelType::default(),
            title_status: TitleStatus::default(),
            title_type: None,
            has_keys: false,
            price: 0.0,
            destination,
            status: ArrivalStatus::default(),
            seller: PartyInfo::default(),
            transporter: TransporterInfo::default(),
            timeline: Timeline::default(),
            images: Vec::new(),
            documents: Vec::new(),
            sale: None,
            notes: String::new(),
            created: Utc::now(),
        }
    }

    /// Short human label, e.g. "2021 Toyota Camry" or the id when the
    /// descriptive fields are still empty
    pub fn label(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if !self.make.is_empty() {
            parts.push(self.make.clone());
        }
        if !self.model.is_empty() {
            parts.push(self.model.clone());
        }
        if parts.is_empty() {
            self.id.to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Find an attached document by id
    pub fn document(&self, doc_id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == doc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_arrival_defaults() {
        let arrival = ArrivalRecord::new(Destination::MainLot);

        assert!(arrival.id.to_string().starts_with("ARV-"));
        assert_eq!(arrival.status, ArrivalStatus::Pending);
        assert_eq!(arrival.fuel_type, FuelType::Gas);
        assert_eq!(arrival.category, VehicleCategory::Sedan);
        assert_eq!(arrival.title_status, TitleStatus::No);
        assert!(!arrival.has_keys);
        assert_eq!(arrival.price, 0.0);
        assert_eq!(arrival.destination, Destination::MainLot);
        assert_eq!(arrival.transporter.driver, "TBD");
        assert!(arrival.timeline.pickup.is_none());
    }

    #[test]
    fn test_title_cycle() {
        assert_eq!(TitleStatus::Yes.cycled(), TitleStatus::Tbo);
        assert_eq!(TitleStatus::Tbo.cycled(), TitleStatus::No);
        assert_eq!(TitleStatus::No.cycled(), TitleStatus::Yes);
    }

    #[test]
    fn test_label() {
        let mut arrival = ArrivalRecord::new(Destination::MainLot);
        assert!(arrival.label().starts_with("ARV-"));

        arrival.year = Some(2021);
        arrival.make = "Toyota".to_string();
        arrival.model = "Camry".to_string();
        assert_eq!(arrival.label(), "2021 Toyota Camry");
    }

    #[test]
    fn test_fuel_type_wire_form() {
        let json = serde_json::to_string(&FuelType::Hybrid).unwrap();
        assert_eq!(json, "\"HYB\"");
        let json = serde_json::to_string(&FuelType::Electric).unwrap();
        assert_eq!(json, "\"ELEC\"");
    }

    #[test]
    fn test_milestone_for_status() {
        let mut arrival = ArrivalRecord::new(Destination::MainLot);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        arrival.timeline.pickup = Some(date);

        assert_eq!(
            arrival.timeline.milestone_for(ArrivalStatus::PickedUp),
            Some(date)
        );
        assert_eq!(arrival.timeline.milestone_for(ArrivalStatus::Paid), None);
        assert_eq!(arrival.timeline.milestone_for(ArrivalStatus::Sold), None);
    }

    #[test]
    fn test_roundtrip() {
        let mut arrival = ArrivalRecord::new(Destination::ServiceCenter);
        arrival.vin = "1HGCM82633A004352".to_string();
        arrival.make = "Honda".to_string();
        arrival.documents.push(Document::new(
            "purchase-invoice.pdf",
            DocumentKind::Invoice,
            "file:///docs/purchase-invoice.pdf",
        ));

        let json = serde_json::to_string(&arrival).unwrap();
        let parsed: ArrivalRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(arrival, parsed);
    }
}
