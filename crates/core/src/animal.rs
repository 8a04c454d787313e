//! Animal lifecycle status vocabulary and state machine.
//!
//! These must match the CHECK constraint on `animals.status`. The state
//! machine is the single authority on which status changes are allowed; the
//! repository layer validates against it inside the same transaction that
//! performs the write.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// In shelter care, adoptable.
pub const STATUS_AVAILABLE: &str = "available";

/// In shelter care, held back (medical or behavioral hold).
pub const STATUS_HOLD: &str = "hold";

/// Placed with an active foster.
pub const STATUS_FOSTERED: &str = "fostered";

pub const STATUS_ADOPTED: &str = "adopted";
pub const STATUS_TRANSFERRED: &str = "transferred";
pub const STATUS_RETURNED_TO_OWNER: &str = "returned_to_owner";
pub const STATUS_EUTHANIZED: &str = "euthanized";

/// All valid animal statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_AVAILABLE,
    STATUS_HOLD,
    STATUS_FOSTERED,
    STATUS_ADOPTED,
    STATUS_TRANSFERRED,
    STATUS_RETURNED_TO_OWNER,
    STATUS_EUTHANIZED,
];

/// Terminal statuses. Once set, the animal record is immutable and exactly
/// one outcome row exists for it.
pub const TERMINAL_STATUSES: &[&str] = &[
    STATUS_ADOPTED,
    STATUS_TRANSFERRED,
    STATUS_RETURNED_TO_OWNER,
    STATUS_EUTHANIZED,
];

pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

/// Initial status for a newly intaken animal.
pub fn initial_status(medical_hold: bool) -> &'static str {
    if medical_hold {
        STATUS_HOLD
    } else {
        STATUS_AVAILABLE
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
///
/// Terminal statuses return an empty slice because no further transitions
/// are allowed.
pub fn valid_transitions(from: &str) -> &'static [&'static str] {
    match from {
        STATUS_AVAILABLE => &[
            STATUS_HOLD,
            STATUS_FOSTERED,
            STATUS_ADOPTED,
            STATUS_TRANSFERRED,
            STATUS_RETURNED_TO_OWNER,
            STATUS_EUTHANIZED,
        ],
        STATUS_HOLD => &[
            STATUS_AVAILABLE,
            STATUS_FOSTERED,
            STATUS_ADOPTED,
            STATUS_TRANSFERRED,
            STATUS_RETURNED_TO_OWNER,
            STATUS_EUTHANIZED,
        ],
        // A fostered animal returns to shelter care or is adopted out of the
        // foster home; it never moves straight to the other terminal states.
        STATUS_FOSTERED => &[STATUS_AVAILABLE, STATUS_HOLD, STATUS_ADOPTED],
        _ => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: &str, to: &str) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a status transition.
///
/// A transition out of a terminal status fails [`CoreError::AlreadyTerminal`]
/// (the record is immutable by invariant); any other disallowed edge fails
/// [`CoreError::InvalidTransition`].
pub fn validate_transition(animal_id: i64, from: &str, to: &str) -> Result<(), CoreError> {
    if is_terminal(from) {
        return Err(CoreError::AlreadyTerminal {
            entity: "Animal",
            id: animal_id,
        });
    }
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "Animal",
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Outcome mapping
// ---------------------------------------------------------------------------

pub const OUTCOME_ADOPTION: &str = "adoption";
pub const OUTCOME_TRANSFER: &str = "transfer";
pub const OUTCOME_RETURN_TO_OWNER: &str = "return_to_owner";
pub const OUTCOME_EUTHANASIA: &str = "euthanasia";

/// The outcome type recorded when an animal enters the given terminal
/// status. Returns `None` for non-terminal statuses.
pub fn outcome_type_for(terminal_status: &str) -> Option<&'static str> {
    match terminal_status {
        STATUS_ADOPTED => Some(OUTCOME_ADOPTION),
        STATUS_TRANSFERRED => Some(OUTCOME_TRANSFER),
        STATUS_RETURNED_TO_OWNER => Some(OUTCOME_RETURN_TO_OWNER),
        STATUS_EUTHANIZED => Some(OUTCOME_EUTHANASIA),
        _ => None,
    }
}

/// Whether an outcome type counts as a live release.
pub fn is_live_outcome(outcome_type: &str) -> bool {
    matches!(
        outcome_type,
        OUTCOME_ADOPTION | OUTCOME_TRANSFER | OUTCOME_RETURN_TO_OWNER
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn available_to_hold() {
        assert!(can_transition(STATUS_AVAILABLE, STATUS_HOLD));
    }

    #[test]
    fn available_to_fostered() {
        assert!(can_transition(STATUS_AVAILABLE, STATUS_FOSTERED));
    }

    #[test]
    fn available_to_every_terminal() {
        for terminal in TERMINAL_STATUSES {
            assert!(can_transition(STATUS_AVAILABLE, terminal));
        }
    }

    #[test]
    fn hold_to_available() {
        assert!(can_transition(STATUS_HOLD, STATUS_AVAILABLE));
    }

    #[test]
    fn hold_to_every_terminal() {
        for terminal in TERMINAL_STATUSES {
            assert!(can_transition(STATUS_HOLD, terminal));
        }
    }

    #[test]
    fn fostered_to_available() {
        assert!(can_transition(STATUS_FOSTERED, STATUS_AVAILABLE));
    }

    #[test]
    fn fostered_to_hold() {
        assert!(can_transition(STATUS_FOSTERED, STATUS_HOLD));
    }

    #[test]
    fn fostered_to_adopted() {
        assert!(can_transition(STATUS_FOSTERED, STATUS_ADOPTED));
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn fostered_cannot_be_euthanized_directly() {
        assert!(!can_transition(STATUS_FOSTERED, STATUS_EUTHANIZED));
    }

    #[test]
    fn fostered_cannot_be_transferred_directly() {
        assert!(!can_transition(STATUS_FOSTERED, STATUS_TRANSFERRED));
    }

    #[test]
    fn no_self_transition() {
        assert!(!can_transition(STATUS_AVAILABLE, STATUS_AVAILABLE));
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        for terminal in TERMINAL_STATUSES {
            assert!(valid_transitions(terminal).is_empty());
        }
    }

    #[test]
    fn unknown_status_has_no_transitions() {
        assert!(valid_transitions("lost").is_empty());
    }

    // -----------------------------------------------------------------------
    // validate_transition error kinds
    // -----------------------------------------------------------------------

    #[test]
    fn transition_out_of_terminal_is_already_terminal() {
        let err = validate_transition(7, STATUS_ADOPTED, STATUS_AVAILABLE).unwrap_err();
        assert!(matches!(
            err,
            CoreError::AlreadyTerminal {
                entity: "Animal",
                id: 7
            }
        ));
    }

    #[test]
    fn disallowed_edge_is_invalid_transition() {
        let err = validate_transition(7, STATUS_FOSTERED, STATUS_EUTHANIZED).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    #[test]
    fn allowed_edge_validates() {
        assert!(validate_transition(7, STATUS_HOLD, STATUS_AVAILABLE).is_ok());
    }

    // -----------------------------------------------------------------------
    // Initial status and outcome mapping
    // -----------------------------------------------------------------------

    #[test]
    fn intake_without_hold_starts_available() {
        assert_eq!(initial_status(false), STATUS_AVAILABLE);
    }

    #[test]
    fn intake_with_medical_hold_starts_on_hold() {
        assert_eq!(initial_status(true), STATUS_HOLD);
    }

    #[test]
    fn every_terminal_status_maps_to_an_outcome_type() {
        for terminal in TERMINAL_STATUSES {
            assert!(outcome_type_for(terminal).is_some());
        }
    }

    #[test]
    fn non_terminal_status_maps_to_no_outcome() {
        assert_eq!(outcome_type_for(STATUS_AVAILABLE), None);
        assert_eq!(outcome_type_for(STATUS_FOSTERED), None);
    }

    #[test]
    fn euthanasia_is_not_a_live_outcome() {
        assert!(is_live_outcome(OUTCOME_ADOPTION));
        assert!(is_live_outcome(OUTCOME_TRANSFER));
        assert!(is_live_outcome(OUTCOME_RETURN_TO_OWNER));
        assert!(!is_live_outcome(OUTCOME_EUTHANASIA));
    }
}
