//! Workflow engine - derived state and guarded actions over arrival records
//!
//! The engine computes what the dispatch surface needs to know about a
//! record (overdue flags, compliance gate results, projected ready dates)
//! and owns the sale sub-flow. Compliance gates are advisory: the store
//! accepts any direct status assignment, and callers that want enforcement
//! use [`WorkflowEngine::checked_transition`].

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::info;

use crate::core::events::{DispatchEvent, EventKind};
use crate::core::identity::ArrivalId;
use crate::core::settings::DispatchSettings;
use crate::core::status::ArrivalStatus;
use crate::core::store::{ArrivalStore, StoreError};
use crate::entities::arrival::{ArrivalRecord, Destination, SaleInfo, TitleStatus};

/// A validation failure on a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Validation failures keyed by field name
///
/// Collected in submit order and reported as a whole; the triggering
/// operation commits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Message for a field, if that field failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for error in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors that can occur during workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("arrival is not sold (current status: {status})")]
    NotSold { status: ArrivalStatus },

    #[error("transition to {to} is blocked: {reason}")]
    GateBlocked { to: ArrivalStatus, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Buyer details submitted to the sale sub-flow
#[derive(Debug, Clone, Default)]
pub struct SaleRequest {
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub sale_price: f64,
}

impl SaleRequest {
    /// Check required fields, reporting every failure at once
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.buyer_name.trim().is_empty() {
            errors.push("buyer_name", "required");
        }
        if self.buyer_email.trim().is_empty() {
            errors.push("buyer_email", "required");
        }
        if self.buyer_phone.trim().is_empty() {
            errors.push("buyer_phone", "required");
        }
        if self.sale_price <= 0.0 {
            errors.push("sale_price", "must be greater than zero");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Fields exposed to the contract-generation collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct ContractData {
    pub arrival: ArrivalId,
    pub vehicle: String,
    pub vin: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub sale_price: f64,
    pub sale_date: NaiveDate,
}

/// Workflow engine over the active dispatch settings
pub struct WorkflowEngine {
    settings: DispatchSettings,
}

impl WorkflowEngine {
    pub fn new(settings: DispatchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Whether a milestone date is strictly in the past, day precision
    ///
    /// An unset date is never overdue.
    pub fn is_overdue(date: Option<NaiveDate>) -> bool {
        Self::is_overdue_on(date, Utc::now().date_naive())
    }

    /// [`Self::is_overdue`] against an explicit current date
    pub fn is_overdue_on(date: Option<NaiveDate>, today: NaiveDate) -> bool {
        date.is_some_and(|d| d < today)
    }

    /// Whether a paid vehicle has sat uncollected past the alert window
    pub fn needs_pickup_alert(&self, record: &ArrivalRecord) -> bool {
        self.needs_pickup_alert_on(record, Utc::now().date_naive())
    }

    /// [`Self::needs_pickup_alert`] against an explicit current date
    pub fn needs_pickup_alert_on(&self, record: &ArrivalRecord, today: NaiveDate) -> bool {
        if record.status != ArrivalStatus::Paid {
            return false;
        }
        match record.timeline.pickup {
            Some(date) => {
                date < today
                    && today.signed_duration_since(date).num_days()
                        >= i64::from(self.settings.overdue_alert_days)
            }
            None => false,
        }
    }

    /// Whether the "mark as Delivered" action should be offered
    pub fn can_mark_delivered(&self, record: &ArrivalRecord) -> bool {
        !self.settings.require_keys_for_delivery || record.has_keys
    }

    /// Whether the "mark as Ready to Sell" action should be offered
    pub fn can_mark_ready(&self, record: &ArrivalRecord) -> bool {
        !self.settings.require_title_for_ready || record.title_status == TitleStatus::Yes
    }

    /// Reason a transition is gated, or None when it may proceed
    pub fn gate_reason(&self, record: &ArrivalRecord, to: ArrivalStatus) -> Option<String> {
        match to {
            ArrivalStatus::Delivered if !self.can_mark_delivered(record) => {
                Some("keys are required before delivery".to_string())
            }
            ArrivalStatus::ReadyToSell if !self.can_mark_ready(record) => {
                Some("title must be on hand before sale readiness".to_string())
            }
            _ => None,
        }
    }

    /// Status assignment with the compliance gates enforced
    ///
    /// Optional layer over the store's free assignment; the stored
    /// representation is the same either way.
    pub fn checked_transition(
        &self,
        store: &mut ArrivalStore,
        id: ArrivalId,
        to: ArrivalStatus,
    ) -> Result<DispatchEvent, WorkflowError> {
        let record = store.get(id).ok_or(StoreError::UnknownArrival { id })?;
        if let Some(reason) = self.gate_reason(record, to) {
            return Err(WorkflowError::GateBlocked { to, reason });
        }
        Ok(store.set_status(id, to)?)
    }

    /// Advance the compact-view title toggle one step
    pub fn cycle_title(&self, record: &mut ArrivalRecord) -> TitleStatus {
        record.title_status = record.title_status.cycled();
        record.title_status
    }

    /// Flip whether keys are on hand
    pub fn toggle_keys(&self, record: &mut ArrivalRecord) -> bool {
        record.has_keys = !record.has_keys;
        record.has_keys
    }

    /// Reassign the destination facility
    pub fn set_destination(&self, record: &mut ArrivalRecord, destination: Destination) {
        record.destination = destination;
    }

    /// Projected ready date: delivery plus the standard prep time
    ///
    /// None when auto-ETA is off or the delivery milestone is unset. Always
    /// derived, never stored.
    pub fn projected_ready(&self, record: &ArrivalRecord) -> Option<NaiveDate> {
        if !self.settings.auto_calculate_eta {
            return None;
        }
        record
            .timeline
            .delivery
            .map(|date| date + chrono::Duration::days(i64::from(self.settings.standard_prep_time)))
    }

    /// Record a completed sale
    ///
    /// Valid from any current status. Stamps the sale and sold dates to the
    /// current date and hands the record off to the sold-equivalent status.
    pub fn record_sale(
        &self,
        store: &mut ArrivalStore,
        id: ArrivalId,
        request: &SaleRequest,
    ) -> Result<DispatchEvent, WorkflowError> {
        request.validate().map_err(WorkflowError::Validation)?;

        let record = store.record_mut(id)?;
        let today = Utc::now().date_naive();
        record.sale = Some(SaleInfo {
            buyer_name: request.buyer_name.clone(),
            buyer_email: request.buyer_email.clone(),
            buyer_phone: request.buyer_phone.clone(),
            sale_price: request.sale_price,
            sale_date: today,
            sold_date: today,
        });
        record.status = ArrivalStatus::Sold;

        info!(arrival = %id, buyer = %request.buyer_name, price = request.sale_price, "sale recorded");
        Ok(DispatchEvent::now(EventKind::SaleRecorded {
            arrival: id,
            label: record.label(),
            buyer: request.buyer_name.clone(),
            price: request.sale_price,
        }))
    }

    /// Reverse a recorded sale and return the record to sale readiness
    pub fn cancel_sale(
        &self,
        store: &mut ArrivalStore,
        id: ArrivalId,
    ) -> Result<DispatchEvent, WorkflowError> {
        let record = store.record_mut(id)?;
        if record.status != ArrivalStatus::Sold {
            return Err(WorkflowError::NotSold {
                status: record.status,
            });
        }
        record.sale = None;
        record.status = ArrivalStatus::ReadyToSell;

        info!(arrival = %id, "sale cancelled");
        Ok(DispatchEvent::now(EventKind::SaleCancelled {
            arrival: id,
            label: record.label(),
        }))
    }

    /// Check an edited record before submit
    pub fn validate_record(&self, record: &ArrivalRecord) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if record.price < 0.0 {
            errors.push("price", "must not be negative");
        }
        if let Some(sale) = &record.sale {
            if sale.sale_price <= 0.0 {
                errors.push("sale_price", "must be greater than zero");
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Capability check and field hand-off for contract generation
    pub fn contract_data(&self, record: &ArrivalRecord) -> Result<ContractData, WorkflowError> {
        match (&record.sale, record.status) {
            (Some(sale), ArrivalStatus::Sold) => Ok(ContractData {
                arrival: record.id,
                vehicle: record.label(),
                vin: record.vin.clone(),
                buyer_name: sale.buyer_name.clone(),
                buyer_email: sale.buyer_email.clone(),
                buyer_phone: sale.buyer_phone.clone(),
                sale_price: sale.sale_price,
                sale_date: sale.sale_date,
            }),
            _ => Err(WorkflowError::NotSold {
                status: record.status,
            }),
        }
    }
}
