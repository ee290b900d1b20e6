use crate::types::{MovementStatus, MovementType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Nested references
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// One equipment movement request as the backend returns it.
///
/// Fields the dashboard does not know about are kept in `extra` so a record
/// patched from a status update response round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub id: u64,
    pub status: MovementStatus,
    pub movement_type: MovementType,
    #[serde(deserialize_with = "lenient_utc")]
    pub movement_date: DateTime<Utc>,
    pub from_location: Location,
    pub to_location: Location,
    pub moved_by: Person,
    pub handled_by: Person,
    pub logistics_cost: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Movement {
    /// Calendar day of `movement_date` in UTC.
    pub fn movement_day(&self) -> NaiveDate {
        self.movement_date.date_naive()
    }

    /// The five values the search box matches against.
    pub fn search_fields(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.from_location.name.clone(),
            self.to_location.name.clone(),
            self.moved_by.name.clone(),
            self.handled_by.name.clone(),
        ]
    }

    pub fn is_pending(&self) -> bool {
        self.status == MovementStatus::Pending
    }
}

/// Accept RFC 3339 timestamps and the naive `YYYY-MM-DDTHH:MM:SS[.f]` form
/// some backends emit; naive values are taken as UTC.
fn lenient_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid movement_date timestamp: {raw}"))
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
