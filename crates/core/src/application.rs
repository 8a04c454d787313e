//! Adoption/foster application pipeline state machine.
//!
//! Statuses must match the CHECK constraint on `applications.status`. The
//! pipeline only moves forward: a decided or withdrawn application never
//! returns to `received` or `review`.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const APP_RECEIVED: &str = "received";
pub const APP_REVIEW: &str = "review";
pub const APP_APPROVED: &str = "approved";
pub const APP_DENIED: &str = "denied";
pub const APP_WITHDRAWN: &str = "withdrawn";

/// All valid application statuses.
pub const VALID_STATUSES: &[&str] = &[
    APP_RECEIVED,
    APP_REVIEW,
    APP_APPROVED,
    APP_DENIED,
    APP_WITHDRAWN,
];

/// Terminal application statuses (no reopen).
pub const TERMINAL_STATUSES: &[&str] = &[APP_APPROVED, APP_DENIED, APP_WITHDRAWN];

pub fn is_terminal(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

// ---------------------------------------------------------------------------
// Kind constants
// ---------------------------------------------------------------------------

pub const KIND_ADOPTION: &str = "adoption";
pub const KIND_FOSTER: &str = "foster";

pub const VALID_KINDS: &[&str] = &[KIND_ADOPTION, KIND_FOSTER];

/// Validate that an application kind is one of the accepted values.
pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    if VALID_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid application kind '{kind}'. Must be one of: {}",
            VALID_KINDS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Returns the set of valid target statuses reachable from `from`.
///
/// `withdrawn` is applicant-initiated and reachable from either pre-decision
/// stage. Approval and denial require the application to be in `review`
/// first.
pub fn valid_transitions(from: &str) -> &'static [&'static str] {
    match from {
        APP_RECEIVED => &[APP_REVIEW, APP_WITHDRAWN],
        APP_REVIEW => &[APP_APPROVED, APP_DENIED, APP_WITHDRAWN],
        _ => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: &str, to: &str) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a pipeline transition; out-of-order calls fail
/// [`CoreError::InvalidTransition`].
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            entity: "Application",
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn received_to_review() {
        assert!(can_transition(APP_RECEIVED, APP_REVIEW));
    }

    #[test]
    fn received_to_withdrawn() {
        assert!(can_transition(APP_RECEIVED, APP_WITHDRAWN));
    }

    #[test]
    fn review_to_approved() {
        assert!(can_transition(APP_REVIEW, APP_APPROVED));
    }

    #[test]
    fn review_to_denied() {
        assert!(can_transition(APP_REVIEW, APP_DENIED));
    }

    #[test]
    fn review_to_withdrawn() {
        assert!(can_transition(APP_REVIEW, APP_WITHDRAWN));
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn received_cannot_be_approved_directly() {
        assert!(!can_transition(APP_RECEIVED, APP_APPROVED));
    }

    #[test]
    fn received_cannot_be_denied_directly() {
        assert!(!can_transition(APP_RECEIVED, APP_DENIED));
    }

    #[test]
    fn no_edge_returns_to_received() {
        for from in VALID_STATUSES {
            assert!(!can_transition(from, APP_RECEIVED), "from {from}");
        }
    }

    #[test]
    fn terminal_statuses_have_no_transitions() {
        for terminal in TERMINAL_STATUSES {
            assert!(valid_transitions(terminal).is_empty());
        }
    }

    #[test]
    fn approved_cannot_revert_to_review() {
        assert!(!can_transition(APP_APPROVED, APP_REVIEW));
    }

    #[test]
    fn premature_approve_is_invalid_transition() {
        let err = validate_transition(APP_RECEIVED, APP_APPROVED).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
    }

    // -----------------------------------------------------------------------
    // Kinds
    // -----------------------------------------------------------------------

    #[test]
    fn adoption_and_foster_kinds_accepted() {
        assert!(validate_kind(KIND_ADOPTION).is_ok());
        assert!(validate_kind(KIND_FOSTER).is_ok());
    }

    #[test]
    fn unknown_kind_rejected() {
        assert!(validate_kind("surrender").is_err());
    }
}
