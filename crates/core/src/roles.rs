//! Well-known membership role constants and the authorization rank lattice.
//!
//! These must match the CHECK constraint on `memberships.role`. Role is
//! always resolved from a membership row at request time; it is never
//! client-supplied state.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_VOLUNTEER: &str = "volunteer";
pub const ROLE_FOSTER: &str = "foster";
pub const ROLE_READONLY: &str = "readonly";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_STAFF,
    ROLE_VOLUNTEER,
    ROLE_FOSTER,
    ROLE_READONLY,
];

/// Authorization rank for a role.
///
/// Rank order: readonly < volunteer = foster < staff < admin. Returns `None`
/// for an unknown role name, which callers must treat as denied.
pub fn role_rank(role: &str) -> Option<u8> {
    match role {
        ROLE_READONLY => Some(0),
        ROLE_VOLUNTEER | ROLE_FOSTER => Some(1),
        ROLE_STAFF => Some(2),
        ROLE_ADMIN => Some(3),
        _ => None,
    }
}

/// Whether `actual` grants at least the privileges of `required`.
///
/// Unknown role names on either side never satisfy anything.
pub fn satisfies(actual: &str, required: &str) -> bool {
    match (role_rank(actual), role_rank(required)) {
        (Some(a), Some(r)) => a >= r,
        _ => false,
    }
}

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Rank ordering
    // -----------------------------------------------------------------------

    #[test]
    fn readonly_is_lowest_rank() {
        assert_eq!(role_rank(ROLE_READONLY), Some(0));
    }

    #[test]
    fn volunteer_and_foster_share_a_rank() {
        assert_eq!(role_rank(ROLE_VOLUNTEER), role_rank(ROLE_FOSTER));
    }

    #[test]
    fn admin_outranks_staff() {
        assert!(role_rank(ROLE_ADMIN) > role_rank(ROLE_STAFF));
    }

    #[test]
    fn unknown_role_has_no_rank() {
        assert_eq!(role_rank("superuser"), None);
    }

    // -----------------------------------------------------------------------
    // satisfies
    // -----------------------------------------------------------------------

    #[test]
    fn admin_satisfies_everything() {
        for required in VALID_ROLES {
            assert!(satisfies(ROLE_ADMIN, required));
        }
    }

    #[test]
    fn staff_satisfies_staff_but_not_admin() {
        assert!(satisfies(ROLE_STAFF, ROLE_STAFF));
        assert!(!satisfies(ROLE_STAFF, ROLE_ADMIN));
    }

    #[test]
    fn foster_satisfies_volunteer_requirement() {
        assert!(satisfies(ROLE_FOSTER, ROLE_VOLUNTEER));
    }

    #[test]
    fn readonly_satisfies_only_readonly() {
        assert!(satisfies(ROLE_READONLY, ROLE_READONLY));
        assert!(!satisfies(ROLE_READONLY, ROLE_VOLUNTEER));
        assert!(!satisfies(ROLE_READONLY, ROLE_STAFF));
    }

    #[test]
    fn unknown_role_satisfies_nothing() {
        assert!(!satisfies("superuser", ROLE_READONLY));
        assert!(!satisfies(ROLE_ADMIN, "superuser"));
    }

    // -----------------------------------------------------------------------
    // validate_role
    // -----------------------------------------------------------------------

    #[test]
    fn valid_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn invalid_role_rejected() {
        let result = validate_role("owner");
        assert!(result.is_err());
    }
}
