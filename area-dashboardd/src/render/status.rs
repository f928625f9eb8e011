//! Status badge styling and capacity bands.
//!
//! Each mapping matches exhaustively on [`AreaStatus`], so a new status
//! has to be added to both.

use shared::types::AreaStatus;

/// CSS class for the status badge; `""` for unknown statuses.
pub fn status_class(status: &str) -> &'static str {
    match AreaStatus::parse(status) {
        Some(AreaStatus::Empty) => "empty",
        Some(AreaStatus::Open) => "open",
        Some(AreaStatus::Busy) => "busy",
        Some(AreaStatus::Closed) => "closed",
        None => "",
    }
}

/// Human-readable occupancy band for a status.
pub fn capacity_band(status: &str) -> &'static str {
    match AreaStatus::parse(status) {
        Some(AreaStatus::Empty) => "0%",
        Some(AreaStatus::Open) => "< 30%",
        Some(AreaStatus::Busy) => "30-75%",
        Some(AreaStatus::Closed) => "> 75%",
        None => "N/A",
    }
}
