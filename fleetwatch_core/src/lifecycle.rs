//! Asset lifecycle state machine.
//!
//! ```text
//! Registered ──SUBMIT_DOCS──▶ Catalog_Filling ──SUBMIT_DOCS──▶ Verification ──APPROVE──▶ Active
//!                                   ▲                              │                    │  ▲
//!                                   └───────────REJECT─────────────┘        MAINTENANCE │  │ RESTORE
//!                                                                                       ▼  │
//!                                                                                   Maintenance
//! ```
//!
//! The machine is tolerant: an action that does not apply to the current
//! state leaves it unchanged and is reported as [`TransitionOutcome::Ignored`].
//! `Inactive` (automation downtime) is not part of the table; it is left
//! only by completing the maintenance ticket that caused it.

use crate::model::AssetStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleAction {
    SubmitDocs,
    Approve,
    Reject,
    Maintenance,
    Restore,
}

impl LifecycleAction {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleAction::SubmitDocs => "SUBMIT_DOCS",
            LifecycleAction::Approve => "APPROVE",
            LifecycleAction::Reject => "REJECT",
            LifecycleAction::Maintenance => "MAINTENANCE",
            LifecycleAction::Restore => "RESTORE",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of applying an action to a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionOutcome {
    Applied { from: AssetStatus, to: AssetStatus },
    Ignored { state: AssetStatus, action: LifecycleAction },
}

impl TransitionOutcome {
    /// The state after the transition attempt.
    pub fn state(&self) -> AssetStatus {
        match self {
            TransitionOutcome::Applied { to, .. } => *to,
            TransitionOutcome::Ignored { state, .. } => *state,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied { .. })
    }
}

/// Looks up the transition table. Mismatched actions return `None`.
pub fn transition_target(current: AssetStatus, action: LifecycleAction) -> Option<AssetStatus> {
    use AssetStatus::*;
    use LifecycleAction::*;

    match (current, action) {
        (Registered, SubmitDocs) => Some(CatalogFilling),
        (CatalogFilling, SubmitDocs) => Some(Verification),
        (Verification, Approve) => Some(Active),
        (Verification, Reject) => Some(CatalogFilling),
        (Active, LifecycleAction::Maintenance) => Some(AssetStatus::Maintenance),
        (AssetStatus::Maintenance, Restore) => Some(Active),
        _ => None,
    }
}

/// The next lifecycle state; the current state when the action does not apply.
pub fn next_lifecycle_state(current: AssetStatus, action: LifecycleAction) -> AssetStatus {
    transition_target(current, action).unwrap_or(current)
}

/// Applies an action, reporting whether it changed anything.
pub fn apply(current: AssetStatus, action: LifecycleAction) -> TransitionOutcome {
    match transition_target(current, action) {
        Some(to) => TransitionOutcome::Applied { from: current, to },
        None => TransitionOutcome::Ignored {
            state: current,
            action,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssetStatus::*;

    #[test]
    fn test_happy_path_to_active() {
        let mut state = Registered;
        state = next_lifecycle_state(state, LifecycleAction::SubmitDocs);
        assert_eq!(state, CatalogFilling);
        state = next_lifecycle_state(state, LifecycleAction::SubmitDocs);
        assert_eq!(state, Verification);
        state = next_lifecycle_state(state, LifecycleAction::Approve);
        assert_eq!(state, Active);
    }

    #[test]
    fn test_mismatched_action_is_noop() {
        assert_eq!(next_lifecycle_state(Registered, LifecycleAction::Approve), Registered);
        assert_eq!(next_lifecycle_state(Active, LifecycleAction::SubmitDocs), Active);
        assert_eq!(next_lifecycle_state(Maintenance, LifecycleAction::Maintenance), Maintenance);
    }

    #[test]
    fn test_maintenance_loop() {
        assert_eq!(next_lifecycle_state(Active, LifecycleAction::Maintenance), Maintenance);
        assert_eq!(next_lifecycle_state(Maintenance, LifecycleAction::Restore), Active);
    }

    #[test]
    fn test_reject_returns_to_catalog() {
        assert_eq!(next_lifecycle_state(Verification, LifecycleAction::Reject), CatalogFilling);
        assert_eq!(next_lifecycle_state(Active, LifecycleAction::Reject), Active);
    }

    #[test]
    fn test_inactive_is_outside_the_table() {
        for action in [
            LifecycleAction::SubmitDocs,
            LifecycleAction::Approve,
            LifecycleAction::Reject,
            LifecycleAction::Maintenance,
            LifecycleAction::Restore,
        ] {
            assert_eq!(
                apply(Inactive, action),
                TransitionOutcome::Ignored { state: Inactive, action }
            );
        }
    }

    #[test]
    fn test_apply_reports_outcome() {
        let outcome = apply(Verification, LifecycleAction::Approve);
        assert!(outcome.is_applied());
        assert_eq!(outcome.state(), Active);

        let outcome = apply(Registered, LifecycleAction::Restore);
        assert!(!outcome.is_applied());
        assert_eq!(outcome.state(), Registered);
    }
}
