use std::fmt;
use serde::{Serialize, Deserialize};

/// Opaque area identifier. Backends send either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AreaId {
    Number(i64),
    Text(String),
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaId::Number(n) => write!(f, "{}", n),
            AreaId::Text(s) => f.write_str(s),
        }
    }
}

/// One area as returned by the backend's area list.
/// Every fetch returns a complete snapshot of these, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaRecord {
    /// Stable across fetches; some backends omit it
    #[serde(default)]
    pub id: Option<AreaId>,

    /// Display name, e.g. "Computer Lab"
    pub name: String,

    /// Occupancy status as received, e.g. "busy" or "BUSY"
    pub status: String,

    pub people_count: u32,

    /// Elapsed time since the reading, pre-formatted by the backend
    pub time_ago: String,

    /// Backend considers this reading stale
    #[serde(default)]
    pub is_outdated: bool,
}

/// The known occupancy statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaStatus {
    Empty,
    Open,
    Busy,
    Closed,
}

impl AreaStatus {
    /// Case-insensitive parse; unknown values yield `None`.
    pub fn parse(status: &str) -> Option<Self> {
        match status.to_ascii_lowercase().as_str() {
            "empty" => Some(AreaStatus::Empty),
            "open" => Some(AreaStatus::Open),
            "busy" => Some(AreaStatus::Busy),
            "closed" => Some(AreaStatus::Closed),
            _ => None,
        }
    }
}
