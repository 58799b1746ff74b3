//! Arrival workflow status and its two ranking scales
//!
//! A status carries two independent numeric orderings. The progression rank
//! follows the operational order a vehicle moves through the pipeline; the
//! display-priority rank orders the dispatch list so that vehicles needing
//! the most attention surface first. The two look similar but answer
//! different questions and are kept as separate lookup tables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workflow status of an arrival
///
/// This is a plain tagged value, not a transition-checked state machine:
/// any status may be assigned from any other, since dispatch steps can be
/// skipped or corrected after the fact. `Sold` is the terminal value handed
/// off to the broader inventory once the sale sub-flow completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalStatus {
    #[default]
    Pending,
    Paid,
    PickedUp,
    Delivered,
    Fixing,
    ReadyToSell,
    Sold,
}

/// The six dispatch states in progression order, excluding the terminal
/// `Sold` value
pub const DISPATCH_STATES: [ArrivalStatus; 6] = [
    ArrivalStatus::Pending,
    ArrivalStatus::Paid,
    ArrivalStatus::PickedUp,
    ArrivalStatus::Delivered,
    ArrivalStatus::Fixing,
    ArrivalStatus::ReadyToSell,
];

impl ArrivalStatus {
    /// Position in the operational order Pending -> ... -> Ready to Sell
    ///
    /// Used for timeline highlighting and rollback eligibility, never for
    /// list ordering.
    pub fn progression_rank(self) -> u8 {
        match self {
            ArrivalStatus::Pending => 0,
            ArrivalStatus::Paid => 1,
            ArrivalStatus::PickedUp => 2,
            ArrivalStatus::Delivered => 3,
            ArrivalStatus::Fixing => 4,
            ArrivalStatus::ReadyToSell => 5,
            ArrivalStatus::Sold => 6,
        }
    }

    /// Position in the dispatch-list sort order
    ///
    /// Vehicles in the shop (Delivered/Fixing) surface first; Ready items
    /// sink to the bottom since they need no further dispatch action.
    pub fn display_priority(self) -> u8 {
        match self {
            ArrivalStatus::Delivered => 0,
            ArrivalStatus::Fixing => 1,
            ArrivalStatus::PickedUp => 2,
            ArrivalStatus::Paid => 3,
            ArrivalStatus::Pending => 4,
            ArrivalStatus::ReadyToSell => 5,
            ArrivalStatus::Sold => 6,
        }
    }

    /// Whether this arrival has left the dispatch pipeline
    pub fn is_sold(self) -> bool {
        self == ArrivalStatus::Sold
    }
}

impl std::fmt::Display for ArrivalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrivalStatus::Pending => write!(f, "Pending"),
            ArrivalStatus::Paid => write!(f, "Paid"),
            ArrivalStatus::PickedUp => write!(f, "Picked Up"),
            ArrivalStatus::Delivered => write!(f, "Delivered"),
            ArrivalStatus::Fixing => write!(f, "Fixing"),
            ArrivalStatus::ReadyToSell => write!(f, "Ready to Sell"),
            ArrivalStatus::Sold => write!(f, "Sold"),
        }
    }
}

/// Error returned when a status label cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status \"{0}\"")]
pub struct StatusParseError(pub String);

impl std::str::FromStr for ArrivalStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "pending" => Ok(ArrivalStatus::Pending),
            "paid" => Ok(ArrivalStatus::Paid),
            "picked_up" => Ok(ArrivalStatus::PickedUp),
            "delivered" => Ok(ArrivalStatus::Delivered),
            "fixing" => Ok(ArrivalStatus::Fixing),
            "ready_to_sell" => Ok(ArrivalStatus::ReadyToSell),
            "sold" => Ok(ArrivalStatus::Sold),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}
