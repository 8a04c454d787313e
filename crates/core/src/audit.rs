//! Audit logging constants and snapshot helpers.
//!
//! Every mutating workflow operation appends one audit entry per mutated
//! entity, inside the same transaction as the mutation (log-or-nothing).
//! Entries carry a before/after snapshot of the changed fields so prior
//! state is reconstructable from the log alone.

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known action values for audit log entries.
pub mod actions {
    pub const ORG_CREATE: &str = "org_create";
    pub const MEMBER_ADD: &str = "member_add";
    pub const MEMBER_REMOVE: &str = "member_remove";
    pub const ANIMAL_INTAKE: &str = "animal_intake";
    pub const ANIMAL_STATUS_CHANGE: &str = "animal_status_change";
    pub const OUTCOME_RECORD: &str = "outcome_record";
    pub const TASK_CREATE: &str = "task_create";
    pub const TASK_UPDATE: &str = "task_update";
    pub const TASK_COMPLETE: &str = "task_complete";
    pub const TASK_CANCEL: &str = "task_cancel";
    pub const APPLICATION_SUBMIT: &str = "application_submit";
    pub const APPLICATION_STATUS_CHANGE: &str = "application_status_change";
    pub const ADOPTION_FINALIZE: &str = "adoption_finalize";
    pub const FOSTER_PLACE: &str = "foster_place";
    pub const FOSTER_END: &str = "foster_end";
    pub const PERSON_CREATE: &str = "person_create";
    pub const PERSON_UPDATE: &str = "person_update";
    pub const NOTE_CREATE: &str = "note_create";
}

// ---------------------------------------------------------------------------
// Entity type constants
// ---------------------------------------------------------------------------

/// Known entity type values for audit log entries.
pub mod entity_types {
    pub const ORGANIZATION: &str = "organization";
    pub const MEMBERSHIP: &str = "membership";
    pub const ANIMAL: &str = "animal";
    pub const OUTCOME: &str = "outcome";
    pub const MEDICAL_TASK: &str = "medical_task";
    pub const MEDICAL_RECORD: &str = "medical_record";
    pub const APPLICATION: &str = "application";
    pub const FOSTER_ASSIGNMENT: &str = "foster_assignment";
    pub const ADOPTION: &str = "adoption";
    pub const PERSON: &str = "person";
    pub const NOTE: &str = "note";
}

// ---------------------------------------------------------------------------
// Change snapshots
// ---------------------------------------------------------------------------

/// Build a `{"before": .., "after": ..}` snapshot keeping only the
/// top-level fields that differ between the two states.
///
/// Non-object inputs are kept whole. A field present on one side only
/// appears on that side with its value (the other side omits it).
pub fn change_snapshot(before: &serde_json::Value, after: &serde_json::Value) -> serde_json::Value {
    let (serde_json::Value::Object(before_map), serde_json::Value::Object(after_map)) =
        (before, after)
    else {
        return serde_json::json!({ "before": before, "after": after });
    };

    let mut changed_before = serde_json::Map::new();
    let mut changed_after = serde_json::Map::new();

    for (key, before_val) in before_map {
        match after_map.get(key) {
            Some(after_val) if after_val == before_val => {}
            Some(after_val) => {
                changed_before.insert(key.clone(), before_val.clone());
                changed_after.insert(key.clone(), after_val.clone());
            }
            None => {
                changed_before.insert(key.clone(), before_val.clone());
            }
        }
    }
    for (key, after_val) in after_map {
        if !before_map.contains_key(key) {
            changed_after.insert(key.clone(), after_val.clone());
        }
    }

    serde_json::json!({
        "before": serde_json::Value::Object(changed_before),
        "after": serde_json::Value::Object(changed_after),
    })
}

/// Snapshot for a creation: no prior state.
pub fn creation_snapshot(after: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "before": serde_json::Value::Null, "after": after })
}
