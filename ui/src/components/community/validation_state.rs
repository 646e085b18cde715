use super::surface::RegionStatus;
use server::community::ConnectionTarget;
use std::collections::HashMap;

/// Outcome of the most recent validation for a given target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pending,
    Success,
    Failure,
}

/// The target a validation was requested for, and what came back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationSnapshot {
    pub target: ConnectionTarget,
    pub outcome: ValidationOutcome,
}

/// Whether the retained result applies to the live target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    NoResult,
    AppliedSuccess,
    AppliedFailure,
}

/// Remembers validation outcomes per connection target and decides whether
/// one of them describes the live configuration.
///
/// Each outcome is stored against the target it was requested for, even when
/// it arrives after the user has moved on. An outcome only ever applies while
/// the live target is exactly that target, so a late answer for A can never
/// paint or unpaint B, and switching back to A shows A's answer again.
#[derive(Clone, Debug, Default)]
pub struct ValidationStateTracker {
    outcomes: HashMap<ConnectionTarget, ValidationOutcome>,
}

impl ValidationStateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything. A freshly loaded configuration is never pre-validated.
    pub fn reset(&mut self) {
        self.outcomes.clear();
    }

    /// Records that a round trip was started for `target`.
    pub fn mark_pending(&mut self, target: ConnectionTarget) {
        self.outcomes.insert(target, ValidationOutcome::Pending);
    }

    /// Records a completed round trip for `target`, replacing any earlier
    /// outcome for that target only.
    pub fn record(&mut self, target: ConnectionTarget, valid: bool) {
        let outcome = if valid {
            ValidationOutcome::Success
        } else {
            ValidationOutcome::Failure
        };
        self.outcomes.insert(target, outcome);
    }

    pub fn snapshot_for(&self, target: &ConnectionTarget) -> Option<ValidationSnapshot> {
        self.outcomes.get(target).map(|outcome| ValidationSnapshot {
            target: target.clone(),
            outcome: *outcome,
        })
    }

    pub fn state_for(&self, live: &ConnectionTarget) -> TrackerState {
        match self.outcomes.get(live) {
            Some(ValidationOutcome::Success) => TrackerState::AppliedSuccess,
            Some(ValidationOutcome::Failure) => TrackerState::AppliedFailure,
            Some(ValidationOutcome::Pending) | None => TrackerState::NoResult,
        }
    }

    /// `true` only when the service's latest answer for the live target was a success.
    pub fn is_confirmed(&self, live: &ConnectionTarget) -> bool {
        self.state_for(live) == TrackerState::AppliedSuccess
    }

    pub fn is_pending_for(&self, live: &ConnectionTarget) -> bool {
        self.outcomes.get(live) == Some(&ValidationOutcome::Pending)
    }

    pub fn region_status_for(&self, live: &ConnectionTarget) -> RegionStatus {
        match self.state_for(live) {
            TrackerState::NoResult => RegionStatus::Neutral,
            TrackerState::AppliedSuccess => RegionStatus::Success,
            TrackerState::AppliedFailure => RegionStatus::Error,
        }
    }
}
