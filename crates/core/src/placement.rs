//! Well-known foster assignment status constants.
//!
//! These must match the CHECK constraint on `foster_assignments.status`.
//! At most one assignment per animal is `active` at any time; the store
//! backs this with a partial unique index.

use crate::error::CoreError;

pub const ASSIGNMENT_ACTIVE: &str = "active";
pub const ASSIGNMENT_COMPLETED: &str = "completed";
pub const ASSIGNMENT_FAILED: &str = "failed";

/// Statuses an active assignment may be closed with.
pub const VALID_CLOSE_STATUSES: &[&str] = &[ASSIGNMENT_COMPLETED, ASSIGNMENT_FAILED];

/// Validate the status used to close an active assignment.
pub fn validate_close_status(status: &str) -> Result<(), CoreError> {
    if VALID_CLOSE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid foster close status '{status}'. Must be one of: {}",
            VALID_CLOSE_STATUSES.join(", ")
        )))
    }
}
