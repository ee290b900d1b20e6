use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepotError {
    #[error("not initialized: run 'depot init'")]
    NotInitialized,

    #[error("failed to load movements: {0}")]
    FetchFailed(String),

    #[error("movement not found: {0}")]
    NotFound(u64),

    #[error("status update for movement {id} failed: {reason}")]
    MutationFailed { id: u64, reason: String },

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("a status update for movement {0} is already in flight")]
    TransitionInFlight(u64),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid movement type '{0}': expected install, swap, retrieve or all")]
    InvalidMovementType(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown column: {0}")]
    InvalidColumn(String),

    #[error("column '{0}' is not sortable")]
    NotSortable(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl DepotError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DepotError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DepotError>;
