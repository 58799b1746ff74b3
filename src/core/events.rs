//! Event descriptions for the notification collaborator
//!
//! Registry mutations and workflow transitions produce a [`DispatchEvent`]
//! describing what happened. Events are informational: the core hands them
//! to whatever notification surface the composition layer wires up, with no
//! delivery guarantee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::ArrivalId;
use crate::core::registry::CatalogKind;
use crate::core::status::ArrivalStatus;

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    CatalogEntryAdded {
        kind: CatalogKind,
        name: String,
    },
    CatalogEntryRemoved {
        kind: CatalogKind,
        name: String,
        /// Models removed by the cascade when a make is deleted
        cascaded_models: usize,
    },
    StatusChanged {
        arrival: ArrivalId,
        label: String,
        from: ArrivalStatus,
        to: ArrivalStatus,
    },
    SaleRecorded {
        arrival: ArrivalId,
        label: String,
        buyer: String,
        price: f64,
    },
    SaleCancelled {
        arrival: ArrivalId,
        label: String,
    },
    SettingsSaved,
}

/// A single notification event with its occurrence time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    pub occurred: DateTime<Utc>,
    pub kind: EventKind,
}

impl DispatchEvent {
    /// Wrap an event kind with the current timestamp
    pub fn now(kind: EventKind) -> Self {
        Self {
            occurred: Utc::now(),
            kind,
        }
    }

    /// Human-readable description for the notification surface
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            EventKind::CatalogEntryAdded { kind, name } => {
                write!(f, "{} \"{}\" added", kind, name)
            }
            EventKind::CatalogEntryRemoved {
                kind,
                name,
                cascaded_models,
            } => {
                if *cascaded_models > 0 {
                    write!(
                        f,
                        "{} \"{}\" removed along with {} model(s)",
                        kind, name, cascaded_models
                    )
                } else {
                    write!(f, "{} \"{}\" removed", kind, name)
                }
            }
            EventKind::StatusChanged {
                label, from, to, ..
            } => {
                write!(f, "{} moved from {} to {}", label, from, to)
            }
            EventKind::SaleRecorded {
                label,
                buyer,
                price,
                ..
            } => {
                write!(f, "{} sold to {} for ${:.2}", label, buyer, price)
            }
            EventKind::SaleCancelled { label, .. } => {
                write!(f, "sale cancelled for {}", label)
            }
            EventKind::SettingsSaved => write!(f, "dispatch settings saved"),
        }
    }
}
