use crate::types::DbId;

/// Domain error type shared by the repository and API layers.
///
/// Every variant is a permanent failure for the given input except
/// [`CoreError::ConcurrentModification`], which a caller may retry after
/// re-reading state. None of these are used as control flow across the API
/// boundary; they serialize into structured JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Referenced id not found, or not visible in the caller's tenant.
    ///
    /// Cross-tenant lookups intentionally collapse into this variant so the
    /// existence of another tenant's entity is never leaked.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// No membership row exists for the (user, organization) pair.
    #[error("User {user_id} is not a member of organization {organization_id}")]
    NotAMember { user_id: DbId, organization_id: DbId },

    /// Requested state change is not in the allowed edge set.
    #[error("Invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// Mutation attempted on a record that is immutable by invariant
    /// (terminal animal, completed/cancelled task).
    #[error("{entity} {id} is in a terminal status and cannot be modified")]
    AlreadyTerminal { entity: &'static str, id: DbId },

    /// The animal already has an active foster assignment.
    #[error("Animal {animal_id} already has an active foster assignment")]
    AnimalAlreadyFostered { animal_id: DbId },

    /// Finalization precondition failed: the application is not approved
    /// (or is the wrong kind for the requested finalization).
    #[error("Application {application_id} is not an approved {expected_kind} application")]
    ApplicationNotApproved {
        application_id: DbId,
        expected_kind: &'static str,
    },

    /// Optimistic-lock mismatch. The caller should re-read and retry.
    #[error("{entity} {id} was modified concurrently; retry with fresh state")]
    ConcurrentModification { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short machine-readable code for API responses and audit details.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::NotAMember { .. } => "NOT_A_MEMBER",
            CoreError::InvalidTransition { .. } => "INVALID_TRANSITION",
            CoreError::AlreadyTerminal { .. } => "ALREADY_TERMINAL",
            CoreError::AnimalAlreadyFostered { .. } => "ANIMAL_ALREADY_FOSTERED",
            CoreError::ApplicationNotApproved { .. } => "APPLICATION_NOT_APPROVED",
            CoreError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
