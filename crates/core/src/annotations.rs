//! Note/photo subject kinds and visibility.
//!
//! Notes and photos attach polymorphically to a (subject kind, subject id)
//! pair. The kind set is closed so the repository layer can verify the
//! subject resolves within the tenant before writing, which a raw
//! polymorphic column cannot express.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Subject kinds
// ---------------------------------------------------------------------------

/// The closed set of entity kinds a note or photo may attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Animal,
    Person,
    Application,
}

impl SubjectKind {
    /// Database value for the `subject_type` column.
    pub fn as_str(self) -> &'static str {
        match self {
            SubjectKind::Animal => "animal",
            SubjectKind::Person => "person",
            SubjectKind::Application => "application",
        }
    }

    /// Parse a `subject_type` column value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "animal" => Ok(SubjectKind::Animal),
            "person" => Ok(SubjectKind::Person),
            "application" => Ok(SubjectKind::Application),
            other => Err(CoreError::Validation(format!(
                "Invalid subject type '{other}'. Must be one of: animal, person, application"
            ))),
        }
    }

    /// Table backing this subject kind, used for tenant-scoped resolution.
    pub fn table(self) -> &'static str {
        match self {
            SubjectKind::Animal => "animals",
            SubjectKind::Person => "people",
            SubjectKind::Application => "applications",
        }
    }

    /// Entity name used in not-found errors for this subject kind.
    pub fn entity_name(self) -> &'static str {
        match self {
            SubjectKind::Animal => "Animal",
            SubjectKind::Person => "Person",
            SubjectKind::Application => "Application",
        }
    }
}

// ---------------------------------------------------------------------------
// Note visibility
// ---------------------------------------------------------------------------

pub const VISIBILITY_STAFF_ONLY: &str = "staff_only";
pub const VISIBILITY_PORTAL_VISIBLE: &str = "portal_visible";

pub const VALID_VISIBILITIES: &[&str] = &[VISIBILITY_STAFF_ONLY, VISIBILITY_PORTAL_VISIBLE];

pub fn validate_visibility(visibility: &str) -> Result<(), CoreError> {
    if VALID_VISIBILITIES.contains(&visibility) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid note visibility '{visibility}'. Must be one of: {}",
            VALID_VISIBILITIES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_kind_round_trips() {
        for kind in [SubjectKind::Animal, SubjectKind::Person, SubjectKind::Application] {
            assert_eq!(SubjectKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_subject_kind_rejected() {
        assert!(SubjectKind::parse("kennel").is_err());
    }

    #[test]
    fn subject_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&SubjectKind::Application).unwrap();
        assert_eq!(json, "\"application\"");
    }

    #[test]
    fn every_subject_kind_has_a_backing_table() {
        assert_eq!(SubjectKind::Animal.table(), "animals");
        assert_eq!(SubjectKind::Person.table(), "people");
        assert_eq!(SubjectKind::Application.table(), "applications");
    }

    #[test]
    fn visibility_values() {
        assert!(validate_visibility(VISIBILITY_STAFF_ONLY).is_ok());
        assert!(validate_visibility(VISIBILITY_PORTAL_VISIBLE).is_ok());
        assert!(validate_visibility("public").is_err());
    }
}
