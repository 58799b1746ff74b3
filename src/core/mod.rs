//! Core module - fundamental types and utilities

pub mod events;
pub mod identity;
pub mod query;
pub mod registry;
pub mod settings;
pub mod status;
pub mod store;
pub mod workflow;

pub use events::{DispatchEvent, EventKind};
pub use identity::{ArrivalId, DocumentId, IdParseError};
pub use query::{
    filter_records, page_controls, pending_delivery, pending_pickup, sort_by_display_priority,
    summarize, ArrivalFilter, DispatchSummary, DispatchView, PageControl, PageResult, Preview,
    PAGE_SIZE, PREVIEW_LIMIT,
};
pub use registry::{
    CatalogKind, DeleteConfirmation, DeleteTarget, ReferenceRegistry, RegistryError,
};
pub use settings::{DispatchSettings, SettingsError};
pub use status::{ArrivalStatus, StatusParseError, DISPATCH_STATES};
pub use store::{ArrivalStore, MediaIngest, RecordPatch, StoreError};
pub use workflow::{
    ContractData, FieldError, SaleRequest, ValidationErrors, WorkflowEngine, WorkflowError,
};
