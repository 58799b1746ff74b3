//! Shared test helpers for integration tests

#![allow(dead_code)]

use lotdesk::core::identity::ArrivalId;
use lotdesk::core::settings::DispatchSettings;
use lotdesk::core::status::ArrivalStatus;
use lotdesk::core::store::ArrivalStore;
use lotdesk::core::workflow::SaleRequest;

pub fn settings() -> DispatchSettings {
    DispatchSettings::with_defaults()
}

/// Create an arrival with a vin/lot pair and a status
pub fn add_arrival(
    store: &mut ArrivalStore,
    vin: &str,
    lot: &str,
    status: ArrivalStatus,
) -> ArrivalId {
    let id = store.create(&settings());
    {
        let record = store.record_mut(id).unwrap();
        record.vin = vin.to_string();
        record.lot_number = lot.to_string();
    }
    store.set_status(id, status).unwrap();
    id
}

/// A sale request that passes validation
pub fn valid_sale() -> SaleRequest {
    SaleRequest {
        buyer_name: "Jane Doe".to_string(),
        buyer_email: "jane@example.com".to_string(),
        buyer_phone: "555-0100".to_string(),
        sale_price: 45000.0,
    }
}
