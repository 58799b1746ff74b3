//! Arrival record store - the working set of vehicles in the intake pipeline
//!
//! Records live in insertion order so pagination stays stable. Updates are
//! last-write-wins on the full record: there is exactly one logical writer
//! at a time and no persistence boundary to synchronize against.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::events::{DispatchEvent, EventKind};
use crate::core::identity::{ArrivalId, DocumentId};
use crate::core::settings::DispatchSettings;
use crate::core::status::ArrivalStatus;
use crate::entities::arrival::{ArrivalRecord, Document};
use crate::entities::handoff::{PublishedVehicle, ReadyAsset};

/// Errors that can occur during store operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("no arrival with id {id}")]
    UnknownArrival { id: ArrivalId },

    #[error("no document {doc_id} on arrival {id}")]
    UnknownDocument { id: ArrivalId, doc_id: DocumentId },

    #[error("image index {index} out of range ({len} image(s))")]
    MediaIndexOutOfRange { index: usize, len: usize },

    #[error("field path \"{path}\" does not address a patchable field")]
    InvalidPatchPath { path: String },

    #[error("patch produced an invalid record: {message}")]
    InvalidPatch { message: String },
}

/// A partial field patch with dotted paths for nested objects
///
/// Paths mirror the record's serialized field names, so `seller.name` and
/// `timeline.pickup` address nested fields. A patch is applied as a whole:
/// if any path or value is invalid the record is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct RecordPatch {
    fields: Vec<(String, Value)>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field by dotted path
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((path.into(), value.into()));
        self
    }

    /// Clear an optional field by dotted path
    pub fn clear(self, path: impl Into<String>) -> Self {
        self.set(path, Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Write one value into a serialized record tree
fn apply_path(doc: &mut Value, path: &str, value: Value) -> Result<(), StoreError> {
    let invalid = || StoreError::InvalidPatchPath {
        path: path.to_string(),
    };

    if path.is_empty() || path == "id" || path.starts_with("id.") {
        return Err(invalid());
    }

    let mut current = doc;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(invalid());
        }
        let map = current.as_object_mut().ok_or_else(invalid)?;
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return Ok(());
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
    }
    Err(invalid())
}

/// A resolved media ingestion awaiting its merge into the owning record
///
/// File reads resolve outside the store; each completion is merged by
/// appending to the record's then-current image list, so late completions
/// never clobber images added in the meantime.
#[derive(Debug, Clone)]
pub struct MediaIngest {
    arrival: ArrivalId,
    uri: String,
}

impl MediaIngest {
    pub fn new(arrival: ArrivalId, uri: impl Into<String>) -> Self {
        Self {
            arrival,
            uri: uri.into(),
        }
    }

    /// Merge the resolved image into the owning record
    pub fn merge(self, store: &mut ArrivalStore) -> Result<usize, StoreError> {
        store.upsert_media(self.arrival, self.uri)
    }
}

/// In-memory working set of arrival records
#[derive(Debug, Clone, Default)]
pub struct ArrivalStore {
    records: Vec<ArrivalRecord>,
}

impl ArrivalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, insertion order preserved
    pub fn list(&self) -> &[ArrivalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ArrivalId) -> Option<&ArrivalRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Mutable access for direct field-level edits
    pub fn record_mut(&mut self, id: ArrivalId) -> Result<&mut ArrivalRecord, StoreError> {
        self.records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(StoreError::UnknownArrival { id })
    }

    /// Create a blank arrival with default field values
    pub fn create(&mut self, settings: &DispatchSettings) -> ArrivalId {
        let record = ArrivalRecord::new(settings.default_destination);
        let id = record.id;
        info!(arrival = %id, "arrival created");
        self.records.push(record);
        id
    }

    /// Create an arrival seeded from a published-inventory hand-off
    pub fn create_from_asset(
        &mut self,
        asset: ReadyAsset,
        settings: &DispatchSettings,
    ) -> ArrivalId {
        let mut record = ArrivalRecord::new(settings.default_destination);
        record.vin = asset.vin;
        record.lot_number = asset.lot_number;
        record.year = asset.year;
        record.make = asset.make;
        record.model = asset.model;
        record.trim = asset.trim;
        record.color = asset.color;
        record.category = asset.category;
        record.fuel_type = asset.fuel_type;
        record.price = asset.price;

        let id = record.id;
        info!(arrival = %id, "arrival created from ready asset");
        self.records.push(record);
        id
    }

    /// Merge a partial field patch into a record
    ///
    /// Either the whole patch applies or nothing changes.
    pub fn update(&mut self, id: ArrivalId, patch: RecordPatch) -> Result<(), StoreError> {
        let record = self.record_mut(id)?;

        let mut doc = serde_json::to_value(&*record).map_err(|e| StoreError::InvalidPatch {
            message: e.to_string(),
        })?;
        for (path, value) in patch.fields {
            debug!(arrival = %id, path = %path, "applying field patch");
            apply_path(&mut doc, &path, value)?;
        }

        let updated: ArrivalRecord =
            serde_json::from_value(doc).map_err(|e| StoreError::InvalidPatch {
                message: e.to_string(),
            })?;
        *record = updated;
        Ok(())
    }

    /// Assign a workflow status
    ///
    /// Free assignment: any status may be set from any other, and timeline
    /// fields are never touched as a side effect.
    pub fn set_status(
        &mut self,
        id: ArrivalId,
        status: ArrivalStatus,
    ) -> Result<DispatchEvent, StoreError> {
        let record = self.record_mut(id)?;
        let from = record.status;
        record.status = status;
        info!(arrival = %id, from = %from, to = %status, "status changed");
        Ok(DispatchEvent::now(EventKind::StatusChanged {
            arrival: id,
            label: record.label(),
            from,
            to: status,
        }))
    }

    /// Append an image to the record's then-current list
    pub fn upsert_media(
        &mut self,
        id: ArrivalId,
        uri: impl Into<String>,
    ) -> Result<usize, StoreError> {
        let record = self.record_mut(id)?;
        record.images.push(uri.into());
        Ok(record.images.len())
    }

    /// Remove an image by position
    pub fn remove_media(&mut self, id: ArrivalId, index: usize) -> Result<String, StoreError> {
        let record = self.record_mut(id)?;
        if index >= record.images.len() {
            return Err(StoreError::MediaIndexOutOfRange {
                index,
                len: record.images.len(),
            });
        }
        Ok(record.images.remove(index))
    }

    /// Attach a document
    pub fn add_document(&mut self, id: ArrivalId, doc: Document) -> Result<DocumentId, StoreError> {
        let record = self.record_mut(id)?;
        let doc_id = doc.id;
        record.documents.push(doc);
        Ok(doc_id)
    }

    /// Detach a document by id
    pub fn remove_document(
        &mut self,
        id: ArrivalId,
        doc_id: DocumentId,
    ) -> Result<Document, StoreError> {
        let record = self.record_mut(id)?;
        let index = record
            .documents
            .iter()
            .position(|doc| doc.id == doc_id)
            .ok_or(StoreError::UnknownDocument { id, doc_id })?;
        Ok(record.documents.remove(index))
    }

    /// Hand off an arrival's base descriptive fields to the published
    /// inventory
    pub fn publish(&self, id: ArrivalId) -> Result<PublishedVehicle, StoreError> {
        let record = self.get(id).ok_or(StoreError::UnknownArrival { id })?;
        info!(arrival = %id, "arrival published to inventory");
        Ok(PublishedVehicle::from(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::arrival::{Destination, DocumentKind, TitleStatus};

    fn settings() -> DispatchSettings {
        DispatchSettings::with_defaults()
    }

    #[test]
    fn test_create_applies_defaults_from_settings() {
        let mut custom = settings();
        custom.default_destination = Destination::BodyShop;

        let mut store = ArrivalStore::new();
        let id = store.create(&custom);

        let record = store.get(id).unwrap();
        assert_eq!(record.destination, Destination::BodyShop);
        assert_eq!(record.status, ArrivalStatus::Pending);
        assert_eq!(record.title_status, TitleStatus::No);
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut store = ArrivalStore::new();
        let first = store.create(&settings());
        let second = store.create(&settings());
        let third = store.create(&settings());

        let ids: Vec<ArrivalId> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first, second, third]);
    }

    #[test]
    fn test_patch_top_level_and_nested_fields() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        store
            .update(
                id,
                RecordPatch::new()
                    .set("vin", "1HGCM82633A004352")
                    .set("seller.name", "Coastal Auto Auction")
                    .set("timeline.pickup", "2024-03-05")
                    .set("price", 8200.5),
            )
            .unwrap();

        let record = store.get(id).unwrap();
        assert_eq!(record.vin, "1HGCM82633A004352");
        assert_eq!(record.seller.name, "Coastal Auto Auction");
        assert_eq!(
            record.timeline.pickup,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(record.price, 8200.5);
    }

    #[test]
    fn test_patch_clears_optional_field() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        store
            .update(id, RecordPatch::new().set("timeline.pickup", "2024-03-05"))
            .unwrap();
        store
            .update(id, RecordPatch::new().clear("timeline.pickup"))
            .unwrap();

        assert!(store.get(id).unwrap().timeline.pickup.is_none());
    }

    #[test]
    fn test_patch_rejects_id_path() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        let err = store
            .update(id, RecordPatch::new().set("id", "ARV-SOMETHING"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatchPath { .. }));
    }

    #[test]
    fn test_patch_through_scalar_rejected() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        let err = store
            .update(id, RecordPatch::new().set("vin.digits", "123"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatchPath { .. }));
    }

    #[test]
    fn test_invalid_value_leaves_record_unchanged() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());
        store
            .update(id, RecordPatch::new().set("vin", "KEEP-ME"))
            .unwrap();

        let err = store
            .update(
                id,
                RecordPatch::new()
                    .set("vin", "DISCARDED")
                    .set("timeline.pickup", "not-a-date"),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPatch { .. }));

        // No partial commit
        assert_eq!(store.get(id).unwrap().vin, "KEEP-ME");
    }

    #[test]
    fn test_unknown_arrival() {
        let mut store = ArrivalStore::new();
        let ghost = ArrivalId::new();
        let err = store.update(ghost, RecordPatch::new().set("vin", "X")).unwrap_err();
        assert_eq!(err, StoreError::UnknownArrival { id: ghost });
    }

    #[test]
    fn test_set_status_never_touches_timeline() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());
        store
            .update(id, RecordPatch::new().set("timeline.purchase", "2024-01-10"))
            .unwrap();
        let timeline_before = store.get(id).unwrap().timeline;

        for status in [
            ArrivalStatus::Fixing,
            ArrivalStatus::Paid,
            ArrivalStatus::ReadyToSell,
            ArrivalStatus::Pending,
            ArrivalStatus::Delivered,
        ] {
            store.set_status(id, status).unwrap();
        }

        assert_eq!(store.get(id).unwrap().timeline, timeline_before);
        assert_eq!(store.get(id).unwrap().status, ArrivalStatus::Delivered);
    }

    #[test]
    fn test_media_append_and_remove() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        store.upsert_media(id, "file:///img/a.jpg").unwrap();
        store.upsert_media(id, "file:///img/b.jpg").unwrap();

        let removed = store.remove_media(id, 0).unwrap();
        assert_eq!(removed, "file:///img/a.jpg");
        assert_eq!(store.get(id).unwrap().images, vec!["file:///img/b.jpg"]);

        let err = store.remove_media(id, 5).unwrap_err();
        assert!(matches!(err, StoreError::MediaIndexOutOfRange { .. }));
    }

    #[test]
    fn test_late_ingestions_append_to_current_list() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        // Two ingestions start before either completes
        let first = MediaIngest::new(id, "file:///img/front.jpg");
        let second = MediaIngest::new(id, "file:///img/rear.jpg");

        first.merge(&mut store).unwrap();
        // A direct upload lands between the two completions
        store.upsert_media(id, "file:///img/interior.jpg").unwrap();
        second.merge(&mut store).unwrap();

        assert_eq!(
            store.get(id).unwrap().images,
            vec![
                "file:///img/front.jpg",
                "file:///img/interior.jpg",
                "file:///img/rear.jpg",
            ]
        );
    }

    #[test]
    fn test_document_lifecycle() {
        let mut store = ArrivalStore::new();
        let id = store.create(&settings());

        let doc_id = store
            .add_document(
                id,
                Document::new("bill-of-sale.pdf", DocumentKind::Invoice, "file:///docs/bos.pdf"),
            )
            .unwrap();
        assert_eq!(store.get(id).unwrap().documents.len(), 1);

        let removed = store.remove_document(id, doc_id).unwrap();
        assert_eq!(removed.name, "bill-of-sale.pdf");
        assert!(store.get(id).unwrap().documents.is_empty());

        let err = store.remove_document(id, doc_id).unwrap_err();
        assert!(matches!(err, StoreError::UnknownDocument { .. }));
    }

    #[test]
    fn test_create_from_asset_copies_descriptive_fields() {
        let mut store = ArrivalStore::new();
        let asset = ReadyAsset {
            vin: "3FAHP0HA7AR123456".to_string(),
            make: "Ford".to_string(),
            model: "Fusion".to_string(),
            year: Some(2010),
            price: 4300.0,
            ..Default::default()
        };

        let id = store.create_from_asset(asset, &settings());
        let record = store.get(id).unwrap();
        assert_eq!(record.make, "Ford");
        assert_eq!(record.price, 4300.0);
        // Workflow fields stay at defaults
        assert_eq!(record.status, ArrivalStatus::Pending);
        assert!(record.timeline.purchase.is_none());
    }
}
