//! Status transitions on movement requests.
//!
//! A transition is split in three so a host that keeps the screen behind a
//! lock can release it while the backend call runs:
//!
//! ```text
//! begin_transition  (locked)   locate record, check state, build payload
//! backend call      (unlocked) PATCH /equipment-movements/{id}
//! complete / fail   (locked)   patch record or raise a notice
//! ```
//!
//! [`StatusMutator::transition`] runs all three for single-context callers.

use crate::backend::InventoryBackend;
use crate::error::{DepotError, Result};
use crate::movement::Movement;
use crate::screen::{MovementsScreen, TransitionOutcome};
use crate::types::{ActionKind, MovementStatus, MovementType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MovementDatePolicy
// ---------------------------------------------------------------------------

/// What a status change writes into `movement_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementDatePolicy {
    /// Send the time of the status change.
    #[default]
    Stamp,
    /// Send the record's own `movement_date` back unchanged.
    Preserve,
}

impl MovementDatePolicy {
    pub fn resolve(self, record: &Movement, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            MovementDatePolicy::Stamp => now,
            MovementDatePolicy::Preserve => record.movement_date,
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub id: u64,
    pub target: MovementStatus,
}

impl TransitionRequest {
    pub fn new(id: u64, target: MovementStatus) -> Self {
        Self { id, target }
    }

    pub fn from_action(id: u64, action: ActionKind) -> Self {
        Self::new(id, action.target_status())
    }
}

// ---------------------------------------------------------------------------
// StatusUpdate payload
// ---------------------------------------------------------------------------

/// Body of `PATCH /equipment-movements/{id}`: the full record, flattened to ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: MovementStatus,
    pub handled_by: u64,
    pub from_location_id: u64,
    pub from_location_type: String,
    pub to_location_id: u64,
    pub to_location_type: String,
    pub movement_type: MovementType,
    pub movement_date: DateTime<Utc>,
    pub logistics_cost: f64,
    pub moved_by: u64,
}

impl StatusUpdate {
    pub fn from_movement(m: &Movement, status: MovementStatus, movement_date: DateTime<Utc>) -> Self {
        Self {
            status,
            handled_by: m.handled_by.id,
            from_location_id: m.from_location.id,
            from_location_type: m.from_location.kind.clone(),
            to_location_id: m.to_location.id,
            to_location_type: m.to_location.kind.clone(),
            movement_type: m.movement_type,
            movement_date,
            logistics_cost: m.logistics_cost,
            moved_by: m.moved_by.id,
        }
    }
}

/// Check that `current → target` is a transition the dashboard allows.
pub fn check_transition(current: MovementStatus, target: MovementStatus) -> Result<()> {
    if current.can_transition_to(target) {
        return Ok(());
    }
    let reason = if current != MovementStatus::Pending {
        format!("only pending requests can change status (this one is {current})")
    } else {
        "a pending request can only be completed or declined".to_string()
    };
    Err(DepotError::InvalidTransition {
        from: current.to_string(),
        to: target.to_string(),
        reason,
    })
}

// ---------------------------------------------------------------------------
// StatusMutator
// ---------------------------------------------------------------------------

pub struct StatusMutator<'a, B: InventoryBackend + ?Sized> {
    backend: &'a B,
    policy: MovementDatePolicy,
}

impl<'a, B: InventoryBackend + ?Sized> StatusMutator<'a, B> {
    pub fn new(backend: &'a B, policy: MovementDatePolicy) -> Self {
        Self { backend, policy }
    }

    /// Move one record to `request.target` and persist it remotely.
    ///
    /// On success the screen shows the backend's copy of the record. On
    /// failure the record is left as it was and an error notice is queued.
    pub fn transition(
        &self,
        screen: &mut MovementsScreen,
        request: TransitionRequest,
    ) -> Result<TransitionOutcome> {
        let pending = screen.begin_transition(request, self.policy, Utc::now())?;
        match self.backend.update_movement_status(request.id, &pending.payload) {
            Ok(updated) => screen.complete_transition(pending, updated),
            Err(e) => Err(screen.fail_transition(pending, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::movement;
    use crate::inventory::{Equipment, NewEquipment, NewSupplier, Supplier};
    use crate::screen::NoticeLevel;
    use std::sync::Mutex;

    /// Records every status update and answers with a canned result.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<(u64, StatusUpdate)>>,
        fail_with: Option<u16>,
    }

    impl RecordingBackend {
        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Default::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl InventoryBackend for RecordingBackend {
        fn list_movements(&self) -> Result<Vec<Movement>> {
            Ok(Vec::new())
        }

        fn update_movement_status(&self, id: u64, update: &StatusUpdate) -> Result<Movement> {
            self.calls.lock().unwrap().push((id, update.clone()));
            if let Some(status) = self.fail_with {
                return Err(DepotError::Backend {
                    status,
                    body: "upstream unavailable".into(),
                });
            }
            let mut m = movement(id, update.status, update.movement_type);
            m.movement_date = update.movement_date;
            Ok(m)
        }

        fn list_equipment(&self) -> Result<Vec<Equipment>> {
            Ok(Vec::new())
        }

        fn create_equipment(&self, _form: &NewEquipment) -> Result<Equipment> {
            unimplemented!()
        }

        fn list_suppliers(&self) -> Result<Vec<Supplier>> {
            Ok(Vec::new())
        }

        fn create_supplier(&self, _form: &NewSupplier) -> Result<Supplier> {
            unimplemented!()
        }
    }

    fn screen() -> MovementsScreen {
        let mut s = MovementsScreen::new();
        let ticket = s.begin_load();
        s.finish_load(
            ticket,
            Ok(vec![
                movement(1, MovementStatus::Pending, MovementType::Install),
                movement(2, MovementStatus::Completed, MovementType::Swap),
            ]),
        )
        .unwrap();
        s
    }

    #[test]
    fn payload_copies_record_fields() {
        let m = movement(1, MovementStatus::Pending, MovementType::Retrieve);
        let now = Utc::now();
        let p = StatusUpdate::from_movement(&m, MovementStatus::Completed, now);
        assert_eq!(p.status, MovementStatus::Completed);
        assert_eq!(p.movement_type, m.movement_type);
        assert_eq!(p.logistics_cost, m.logistics_cost);
        assert_eq!(p.handled_by, m.handled_by.id);
        assert_eq!(p.moved_by, m.moved_by.id);
        assert_eq!(p.from_location_id, m.from_location.id);
        assert_eq!(p.from_location_type, "warehouse");
        assert_eq!(p.to_location_id, m.to_location.id);
        assert_eq!(p.to_location_type, "site");
        assert_eq!(p.movement_date, now);
    }

    #[test]
    fn payload_serializes_with_backend_field_names() {
        let m = movement(1, MovementStatus::Pending, MovementType::Install);
        let p = StatusUpdate::from_movement(&m, MovementStatus::Declined, m.movement_date);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], "declined");
        assert_eq!(json["movement_type"], "install");
        assert_eq!(json["handled_by"], 41);
        assert_eq!(json["to_location_type"], "site");
    }

    #[test]
    fn date_policy() {
        let m = movement(1, MovementStatus::Pending, MovementType::Install);
        let now = Utc::now();
        assert_eq!(MovementDatePolicy::Stamp.resolve(&m, now), now);
        assert_eq!(MovementDatePolicy::Preserve.resolve(&m, now), m.movement_date);
    }

    #[test]
    fn complete_sends_payload_and_patches_screen() {
        let backend = RecordingBackend::default();
        let mut s = screen();
        let outcome = StatusMutator::new(&backend, MovementDatePolicy::Preserve)
            .transition(&mut s, TransitionRequest::new(1, MovementStatus::Completed))
            .unwrap();

        assert!(matches!(outcome, TransitionOutcome::Applied(_)));
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (id, payload) = &calls[0];
        assert_eq!(*id, 1);
        assert_eq!(payload.status, MovementStatus::Completed);
        assert_eq!(payload.movement_type, MovementType::Install);
        assert_eq!(payload.logistics_cost, 101.0);

        assert_eq!(s.view().record(1).unwrap().status, MovementStatus::Completed);
        let notices = s.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Success);
    }

    #[test]
    fn missing_record_makes_no_call() {
        let backend = RecordingBackend::default();
        let mut s = screen();
        let err = StatusMutator::new(&backend, MovementDatePolicy::Stamp)
            .transition(&mut s, TransitionRequest::new(99, MovementStatus::Completed))
            .unwrap_err();

        assert!(matches!(err, DepotError::NotFound(99)));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn non_pending_record_makes_no_call() {
        let backend = RecordingBackend::default();
        let mut s = screen();
        let err = StatusMutator::new(&backend, MovementDatePolicy::Stamp)
            .transition(&mut s, TransitionRequest::new(2, MovementStatus::Declined))
            .unwrap_err();

        assert!(matches!(err, DepotError::InvalidTransition { .. }));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn in_progress_is_not_a_target() {
        assert!(check_transition(MovementStatus::Pending, MovementStatus::InProgress).is_err());
        assert!(check_transition(MovementStatus::Pending, MovementStatus::Completed).is_ok());
    }

    #[test]
    fn backend_failure_keeps_status_and_raises_notice() {
        let backend = RecordingBackend::failing(500);
        let mut s = screen();
        let err = StatusMutator::new(&backend, MovementDatePolicy::Stamp)
            .transition(&mut s, TransitionRequest::new(1, MovementStatus::Completed))
            .unwrap_err();

        assert!(matches!(err, DepotError::MutationFailed { id: 1, .. }));
        assert_eq!(backend.call_count(), 1);
        assert_eq!(s.view().record(1).unwrap().status, MovementStatus::Pending);
        assert!(!s.is_in_flight(1));

        let notices = s.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(s.drain_notices().is_empty());
    }
}
