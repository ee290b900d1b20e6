use crate::error::{DepotError, Result};
use crate::movement::Movement;
use crate::types::TypeFilter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The three filters of the movements table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MovementFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub movement_type: TypeFilter,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl MovementFilter {
    pub fn is_default(&self) -> bool {
        *self == MovementFilter::default()
    }

    pub fn matches(&self, m: &Movement) -> bool {
        self.matches_search(m)
            && self.movement_type.accepts(m.movement_type)
            && self.date.map_or(true, |day| m.movement_day() == day)
    }

    fn matches_search(&self, m: &Movement) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        m.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Indices into `records` that pass every filter, in input order.
    pub fn apply(&self, records: &[Movement]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, m)| self.matches(m))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Parse the date filter input. Empty (or whitespace) clears the filter.
pub fn parse_date_filter(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DepotError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::movement::{Location, Movement, Person};
    use crate::types::{MovementStatus, MovementType};
    use chrono::{TimeZone, Utc};

    pub fn movement(id: u64, status: MovementStatus, movement_type: MovementType) -> Movement {
        Movement {
            id,
            status,
            movement_type,
            movement_date: Utc.with_ymd_and_hms(2024, 3, 5, 9, 30, 0).unwrap(),
            from_location: Location {
                id: 10 + id,
                name: "Central Warehouse".into(),
                kind: "warehouse".into(),
            },
            to_location: Location {
                id: 20 + id,
                name: format!("Site {id}"),
                kind: "site".into(),
            },
            moved_by: Person {
                id: 30 + id,
                name: "Ada Lovelace".into(),
            },
            handled_by: Person {
                id: 40 + id,
                name: "Grace Hopper".into(),
            },
            logistics_cost: 100.0 + id as f64,
            extra: Default::default(),
        }
    }
}
