use crate::movement::Movement;
use crate::types::ActionKind;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// MovementColumn
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementColumn {
    Id,
    MovementType,
    Status,
    MovementDate,
    FromLocation,
    ToLocation,
    MovedBy,
    HandledBy,
    LogisticsCost,
    Actions,
}

impl MovementColumn {
    pub fn all() -> &'static [MovementColumn] {
        &[
            MovementColumn::Id,
            MovementColumn::MovementType,
            MovementColumn::Status,
            MovementColumn::MovementDate,
            MovementColumn::FromLocation,
            MovementColumn::ToLocation,
            MovementColumn::MovedBy,
            MovementColumn::HandledBy,
            MovementColumn::LogisticsCost,
            MovementColumn::Actions,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementColumn::Id => "id",
            MovementColumn::MovementType => "movement_type",
            MovementColumn::Status => "status",
            MovementColumn::MovementDate => "movement_date",
            MovementColumn::FromLocation => "from_location",
            MovementColumn::ToLocation => "to_location",
            MovementColumn::MovedBy => "moved_by",
            MovementColumn::HandledBy => "handled_by",
            MovementColumn::LogisticsCost => "logistics_cost",
            MovementColumn::Actions => "actions",
        }
    }

    /// Display text for one cell. The actions column has no text of its own.
    pub fn cell(self, m: &Movement) -> String {
        match self {
            MovementColumn::Id => m.id.to_string(),
            MovementColumn::MovementType => m.movement_type.to_string(),
            MovementColumn::Status => m.status.to_string(),
            MovementColumn::MovementDate => m.movement_date.format("%Y-%m-%d %H:%M").to_string(),
            MovementColumn::FromLocation => m.from_location.name.clone(),
            MovementColumn::ToLocation => m.to_location.name.clone(),
            MovementColumn::MovedBy => m.moved_by.name.clone(),
            MovementColumn::HandledBy => m.handled_by.name.clone(),
            MovementColumn::LogisticsCost => format!("{:.2}", m.logistics_cost),
            MovementColumn::Actions => String::new(),
        }
    }

    /// Ordering of two records by this column. Names compare case-insensitively.
    pub fn compare(self, a: &Movement, b: &Movement) -> Ordering {
        match self {
            MovementColumn::Id => a.id.cmp(&b.id),
            MovementColumn::MovementType => a.movement_type.cmp(&b.movement_type),
            MovementColumn::Status => a.status.as_str().cmp(b.status.as_str()),
            MovementColumn::MovementDate => a.movement_date.cmp(&b.movement_date),
            MovementColumn::LogisticsCost => a.logistics_cost.total_cmp(&b.logistics_cost),
            MovementColumn::Actions => Ordering::Equal,
            text => text
                .cell(a)
                .to_lowercase()
                .cmp(&text.cell(b).to_lowercase()),
        }
    }
}

impl fmt::Display for MovementColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementColumn {
    type Err = crate::error::DepotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementColumn::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| crate::error::DepotError::InvalidColumn(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub column: MovementColumn,
    pub label: String,
    pub sortable: bool,
}

impl ColumnDescriptor {
    pub fn new(column: MovementColumn, label: impl Into<String>, sortable: bool) -> Self {
        Self {
            column,
            label: label.into(),
            sortable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub kind: ActionKind,
    pub label: String,
    #[serde(default)]
    pub danger: bool,
}

impl ActionDescriptor {
    pub fn new(kind: ActionKind, label: impl Into<String>, danger: bool) -> Self {
        Self {
            kind,
            label: label.into(),
            danger,
        }
    }
}

/// Columns of the pending/completed movement requests screen.
pub fn movement_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new(MovementColumn::Id, "ID", true),
        ColumnDescriptor::new(MovementColumn::MovementType, "Type", true),
        ColumnDescriptor::new(MovementColumn::Status, "Status", true),
        ColumnDescriptor::new(MovementColumn::MovementDate, "Date", true),
        ColumnDescriptor::new(MovementColumn::FromLocation, "From", true),
        ColumnDescriptor::new(MovementColumn::ToLocation, "To", true),
        ColumnDescriptor::new(MovementColumn::MovedBy, "Moved by", false),
        ColumnDescriptor::new(MovementColumn::HandledBy, "Handled by", false),
        ColumnDescriptor::new(MovementColumn::LogisticsCost, "Logistics cost", true),
        ColumnDescriptor::new(MovementColumn::Actions, "Actions", false),
    ]
}

pub fn movement_actions() -> Vec<ActionDescriptor> {
    vec![
        ActionDescriptor::new(ActionKind::Complete, "Mark completed", false),
        ActionDescriptor::new(ActionKind::Decline, "Decline", true),
    ]
}
