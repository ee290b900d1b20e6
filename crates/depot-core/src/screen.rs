use crate::backend::InventoryBackend;
use crate::config::DashboardConfig;
use crate::error::{DepotError, Result};
use crate::movement::Movement;
use crate::mutator::{check_transition, MovementDatePolicy, StatusUpdate, TransitionRequest};
use crate::table::{movement_actions, movement_columns, MovementColumn};
use crate::view::{DataView, SortState, TableRender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, warn};

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A non-blocking message for the user (toast / banner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transitions in flight
// ---------------------------------------------------------------------------

/// A transition that passed the local checks and awaits the backend.
#[derive(Debug, Clone)]
pub struct PendingTransition {
    pub request: TransitionRequest,
    pub payload: StatusUpdate,
    revision: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The backend's copy of the record now backs the row.
    Applied(Box<Movement>),
    /// The records were replaced while the call ran; the response was dropped.
    Stale,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScreenSnapshot {
    pub search: String,
    pub movement_type: String,
    pub date: Option<String>,
    pub visible_columns: BTreeMap<MovementColumn, bool>,
    pub sort: Option<SortState>,
    pub table: TableRender,
    pub fetch_error: Option<String>,
    pub in_flight: Vec<u64>,
    pub pending_notices: usize,
}

// ---------------------------------------------------------------------------
// MovementsScreen
// ---------------------------------------------------------------------------

/// View-model of the movement requests screen.
///
/// Each load gets a ticket and only the newest ticket may replace the
/// records. Every replacement bumps `revision`; a transition response is
/// dropped if the records were replaced after the transition began.
#[derive(Debug)]
pub struct MovementsScreen {
    view: DataView,
    ticket: u64,
    revision: u64,
    loaded: bool,
    fetch_error: Option<String>,
    notices: Vec<Notice>,
    in_flight: BTreeSet<u64>,
}

impl Default for MovementsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementsScreen {
    pub fn new() -> Self {
        Self {
            view: DataView::new(movement_columns(), movement_actions()),
            ticket: 0,
            revision: 0,
            loaded: false,
            fetch_error: None,
            notices: Vec::new(),
            in_flight: BTreeSet::new(),
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        let mut screen = Self::new();
        screen.view.hide_columns(&cfg.hidden_columns);
        screen
    }

    pub fn view(&self) -> &DataView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut DataView {
        &mut self.view
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    pub fn is_in_flight(&self, id: u64) -> bool {
        self.in_flight.contains(&id)
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    pub fn begin_load(&mut self) -> u64 {
        self.ticket += 1;
        self.view.set_loading(true);
        self.ticket
    }

    /// Apply a finished load. Results for superseded tickets are ignored.
    pub fn finish_load(&mut self, ticket: u64, result: Result<Vec<Movement>>) -> Result<()> {
        if ticket != self.ticket {
            debug!(ticket, latest = self.ticket, "discarding superseded movement load");
            return Ok(());
        }
        self.view.set_loading(false);
        match result {
            Ok(records) => {
                debug!(count = records.len(), "movements loaded");
                self.view.set_records(records);
                self.revision += 1;
                self.loaded = true;
                self.fetch_error = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "failed to load movements");
                let err = DepotError::FetchFailed(e.to_string());
                self.fetch_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Fetch the collection from `backend` and show it.
    pub fn load<B: InventoryBackend + ?Sized>(&mut self, backend: &B) -> Result<()> {
        let ticket = self.begin_load();
        let result = backend.list_movements();
        self.finish_load(ticket, result)
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    pub fn begin_transition(
        &mut self,
        request: TransitionRequest,
        policy: MovementDatePolicy,
        now: DateTime<Utc>,
    ) -> Result<PendingTransition> {
        let Some(record) = self.view.record(request.id) else {
            warn!(id = request.id, "status change for a movement not on screen");
            return Err(DepotError::NotFound(request.id));
        };
        check_transition(record.status, request.target)?;
        if self.in_flight.contains(&request.id) {
            return Err(DepotError::TransitionInFlight(request.id));
        }

        let payload = StatusUpdate::from_movement(
            record,
            request.target,
            policy.resolve(record, now),
        );
        self.in_flight.insert(request.id);
        Ok(PendingTransition {
            request,
            payload,
            revision: self.revision,
        })
    }

    /// Apply the backend's copy of a record.
    ///
    /// A response naming a different movement is rejected as a failed update
    /// and nothing on screen changes.
    pub fn complete_transition(
        &mut self,
        pending: PendingTransition,
        updated: Movement,
    ) -> Result<TransitionOutcome> {
        let id = pending.request.id;
        self.in_flight.remove(&id);
        if pending.revision != self.revision {
            warn!(id, "dropping status response for a reloaded collection");
            return Ok(TransitionOutcome::Stale);
        }
        if updated.id != id {
            return Err(self.reject(
                id,
                format!("backend answered with movement {}", updated.id),
            ));
        }

        let status = updated.status;
        if !self.view.replace_record(updated.clone()) {
            warn!(id, "updated movement is no longer on screen");
        }
        self.notices.push(Notice::new(
            NoticeLevel::Success,
            format!("Movement {id} marked {status}"),
        ));
        Ok(TransitionOutcome::Applied(Box::new(updated)))
    }

    /// Record a failed backend call and hand back the error to report.
    pub fn fail_transition(&mut self, pending: PendingTransition, cause: DepotError) -> DepotError {
        let id = pending.request.id;
        self.in_flight.remove(&id);
        self.reject(id, cause.to_string())
    }

    fn reject(&mut self, id: u64, reason: String) -> DepotError {
        error!(id, reason = %reason, "status update failed");
        let err = DepotError::MutationFailed { id, reason };
        self.notices.push(Notice::new(NoticeLevel::Error, err.to_string()));
        err
    }

    // -----------------------------------------------------------------------
    // Notices & snapshot
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice::new(level, message));
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn snapshot(&mut self) -> ScreenSnapshot {
        let filter = self.view.filter().clone();
        ScreenSnapshot {
            search: filter.search,
            movement_type: filter.movement_type.to_string(),
            date: filter.date.map(|d| d.format("%Y-%m-%d").to_string()),
            visible_columns: self.view.visible_columns().clone(),
            sort: self.view.sort(),
            table: self.view.render(),
            fetch_error: self.fetch_error.clone(),
            in_flight: self.in_flight.iter().copied().collect(),
            pending_notices: self.notices.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
