use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MovementStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStatus {
    Pending,
    InProgress,
    Completed,
    Declined,
}

impl MovementStatus {
    pub fn all() -> &'static [MovementStatus] {
        &[
            MovementStatus::Pending,
            MovementStatus::InProgress,
            MovementStatus::Completed,
            MovementStatus::Declined,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementStatus::Pending => "pending",
            MovementStatus::InProgress => "in_progress",
            MovementStatus::Completed => "completed",
            MovementStatus::Declined => "declined",
        }
    }

    /// Completed and declined requests never leave their state.
    pub fn is_terminal(self) -> bool {
        matches!(self, MovementStatus::Completed | MovementStatus::Declined)
    }

    /// Whether the dashboard offers a transition from `self` to `target`.
    ///
    /// Only `pending → completed` and `pending → declined` exist; `in_progress`
    /// is set elsewhere and is display-only here.
    pub fn can_transition_to(self, target: MovementStatus) -> bool {
        self == MovementStatus::Pending
            && matches!(target, MovementStatus::Completed | MovementStatus::Declined)
    }
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementStatus {
    type Err = crate::error::DepotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MovementStatus::Pending),
            "in_progress" | "in-progress" => Ok(MovementStatus::InProgress),
            "completed" => Ok(MovementStatus::Completed),
            "declined" => Ok(MovementStatus::Declined),
            _ => Err(crate::error::DepotError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MovementType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    Install,
    Swap,
    Retrieve,
}

impl MovementType {
    pub fn all() -> &'static [MovementType] {
        &[
            MovementType::Install,
            MovementType::Swap,
            MovementType::Retrieve,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::Install => "install",
            MovementType::Swap => "swap",
            MovementType::Retrieve => "retrieve",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementType {
    type Err = crate::error::DepotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(MovementType::Install),
            "swap" => Ok(MovementType::Swap),
            "retrieve" => Ok(MovementType::Retrieve),
            _ => Err(crate::error::DepotError::InvalidMovementType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TypeFilter
// ---------------------------------------------------------------------------

/// The movement-type dropdown: every type, or one specific type.
///
/// Serialized as its text form: `"all"` or the type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(MovementType),
}

impl TypeFilter {
    pub fn accepts(self, movement_type: MovementType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => t == movement_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(t) => f.write_str(t.as_str()),
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = crate::error::DepotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(TypeFilter::All),
            other => Ok(TypeFilter::Only(other.parse()?)),
        }
    }
}

impl From<TypeFilter> for String {
    fn from(filter: TypeFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for TypeFilter {
    type Error = crate::error::DepotError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Row-level actions on a movement request.
///
/// Kept symbolic so the presentation layer decides how each one is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Complete,
    Decline,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Complete => "complete",
            ActionKind::Decline => "decline",
        }
    }

    /// The status a record lands in when this action succeeds.
    pub fn target_status(self) -> MovementStatus {
        match self {
            ActionKind::Complete => MovementStatus::Completed,
            ActionKind::Decline => MovementStatus::Declined,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ActionKind::Complete => "check",
            ActionKind::Decline => "x",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SortDirection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
