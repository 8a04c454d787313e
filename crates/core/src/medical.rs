//! Medical compliance engine: task vocabularies, due/overdue classification,
//! and the recurrence policy table.
//!
//! "Overdue" is a classification computed lazily at read time against the
//! caller's clock, never a stored status and never an event that fires.
//! Comparisons are date-only so a task due today is not flagged overdue by
//! its time-of-day.

use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Task type constants
// ---------------------------------------------------------------------------

pub const TASK_VACCINE: &str = "vaccine";
pub const TASK_TREATMENT: &str = "treatment";
pub const TASK_EXAM: &str = "exam";
pub const TASK_SURGERY: &str = "surgery";
pub const TASK_CHECKUP: &str = "checkup";
pub const TASK_OTHER: &str = "other";

/// All valid medical task types.
pub const VALID_TASK_TYPES: &[&str] = &[
    TASK_VACCINE,
    TASK_TREATMENT,
    TASK_EXAM,
    TASK_SURGERY,
    TASK_CHECKUP,
    TASK_OTHER,
];

// ---------------------------------------------------------------------------
// Task status constants
// ---------------------------------------------------------------------------

pub const TASK_SCHEDULED: &str = "scheduled";
pub const TASK_IN_PROGRESS: &str = "in_progress";
pub const TASK_PENDING_REVIEW: &str = "pending_review";
pub const TASK_COMPLETED: &str = "completed";
pub const TASK_CANCELLED: &str = "cancelled";
pub const TASK_ON_HOLD: &str = "on_hold";

/// All valid task statuses.
pub const VALID_TASK_STATUSES: &[&str] = &[
    TASK_SCHEDULED,
    TASK_IN_PROGRESS,
    TASK_PENDING_REVIEW,
    TASK_COMPLETED,
    TASK_CANCELLED,
    TASK_ON_HOLD,
];

/// Terminal task statuses. A task in one of these is never transitioned
/// further; completion side effects are frozen at first completion.
pub const TERMINAL_TASK_STATUSES: &[&str] = &[TASK_COMPLETED, TASK_CANCELLED];

pub fn is_terminal_task_status(status: &str) -> bool {
    TERMINAL_TASK_STATUSES.contains(&status)
}

/// Validate a working-status update (reschedule/reassign path).
///
/// Only non-terminal statuses may be set this way; completion and
/// cancellation go through their dedicated operations so their side effects
/// (record snapshot, follow-up) cannot be skipped.
pub fn validate_working_status(status: &str) -> Result<(), CoreError> {
    if !VALID_TASK_STATUSES.contains(&status) {
        return Err(CoreError::Validation(format!(
            "Invalid task status '{status}'. Must be one of: {}",
            VALID_TASK_STATUSES.join(", ")
        )));
    }
    if is_terminal_task_status(status) {
        return Err(CoreError::Validation(format!(
            "Status '{status}' must be set via the complete/cancel operations"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Read-time classification of a task against a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskClassification {
    Overdue,
    DueToday,
    Upcoming,
    Completed,
    Cancelled,
}

/// Classify a task from its (status, due date) against `as_of`.
///
/// Pure function of its inputs: the same (status, due_date, as_of) always
/// yields the same classification. Date-only comparison -- a task due on
/// `as_of` is `DueToday`, not `Overdue`.
pub fn classify(status: &str, due_date: NaiveDate, as_of: NaiveDate) -> TaskClassification {
    match status {
        TASK_COMPLETED => TaskClassification::Completed,
        TASK_CANCELLED => TaskClassification::Cancelled,
        _ => {
            if due_date < as_of {
                TaskClassification::Overdue
            } else if due_date == as_of {
                TaskClassification::DueToday
            } else {
                TaskClassification::Upcoming
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Recurrence policy
// ---------------------------------------------------------------------------

/// Interval between a completion and the follow-up task it spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceInterval {
    Months(u32),
    Days(u32),
}

/// Per-task-type recurrence intervals.
///
/// This is configuration data, not business law: the table is
/// deserializable so deployments can override it without code changes.
/// Task types absent from the map fall back to `default_interval`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrencePolicy {
    pub intervals: BTreeMap<String, RecurrenceInterval>,
    pub default_interval: RecurrenceInterval,
}

impl Default for RecurrencePolicy {
    fn default() -> Self {
        let mut intervals = BTreeMap::new();
        intervals.insert(TASK_VACCINE.to_string(), RecurrenceInterval::Months(12));
        intervals.insert(TASK_CHECKUP.to_string(), RecurrenceInterval::Months(6));
        intervals.insert(TASK_EXAM.to_string(), RecurrenceInterval::Months(3));
        intervals.insert(TASK_TREATMENT.to_string(), RecurrenceInterval::Days(7));
        Self {
            intervals,
            default_interval: RecurrenceInterval::Days(30),
        }
    }
}

impl RecurrencePolicy {
    /// The interval applied to completions of the given task type.
    pub fn interval_for(&self, task_type: &str) -> RecurrenceInterval {
        self.intervals
            .get(task_type)
            .copied()
            .unwrap_or(self.default_interval)
    }

    /// Due date of the follow-up task spawned by a completion on
    /// `completed_on`.
    pub fn follow_up_due(&self, task_type: &str, completed_on: NaiveDate) -> NaiveDate {
        match self.interval_for(task_type) {
            RecurrenceInterval::Months(m) => completed_on + Months::new(m),
            RecurrenceInterval::Days(d) => completed_on + Duration::days(i64::from(d)),
        }
    }
}

// ---------------------------------------------------------------------------
// Compliance rate
// ---------------------------------------------------------------------------

/// Compliance over a reporting window: completed / (completed + missed).
///
/// "Missed" is a task that became overdue and was never completed; both
/// counts are computed at query time from (status, due_date), never stored.
/// Returns `None` when there is nothing to measure.
pub fn compliance_rate(completed: i64, missed: i64) -> Option<f64> {
    let denominator = completed + missed;
    if denominator <= 0 {
        None
    } else {
        Some(completed as f64 / denominator as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // -----------------------------------------------------------------------
    // Classification
    // -----------------------------------------------------------------------

    #[test]
    fn scheduled_task_past_due_is_overdue() {
        let c = classify(TASK_SCHEDULED, date(2024, 1, 9), date(2024, 1, 10));
        assert_eq!(c, TaskClassification::Overdue);
    }

    #[test]
    fn task_due_today_is_not_overdue() {
        let c = classify(TASK_SCHEDULED, date(2024, 1, 10), date(2024, 1, 10));
        assert_eq!(c, TaskClassification::DueToday);
    }

    #[test]
    fn task_due_tomorrow_is_upcoming() {
        let c = classify(TASK_SCHEDULED, date(2024, 1, 11), date(2024, 1, 10));
        assert_eq!(c, TaskClassification::Upcoming);
    }

    #[test]
    fn completed_task_is_never_overdue() {
        let c = classify(TASK_COMPLETED, date(2020, 1, 1), date(2024, 1, 10));
        assert_eq!(c, TaskClassification::Completed);
    }

    #[test]
    fn cancelled_task_is_never_overdue() {
        let c = classify(TASK_CANCELLED, date(2020, 1, 1), date(2024, 1, 10));
        assert_eq!(c, TaskClassification::Cancelled);
    }

    #[test]
    fn in_progress_and_on_hold_tasks_still_go_overdue() {
        for status in [TASK_IN_PROGRESS, TASK_PENDING_REVIEW, TASK_ON_HOLD] {
            let c = classify(status, date(2024, 1, 1), date(2024, 1, 10));
            assert_eq!(c, TaskClassification::Overdue, "status {status}");
        }
    }

    #[test]
    fn classify_is_deterministic() {
        let a = classify(TASK_SCHEDULED, date(2024, 3, 1), date(2024, 3, 5));
        let b = classify(TASK_SCHEDULED, date(2024, 3, 1), date(2024, 3, 5));
        assert_eq!(a, b);
    }

    // -----------------------------------------------------------------------
    // Recurrence policy
    // -----------------------------------------------------------------------

    #[test]
    fn vaccine_completed_recurs_in_twelve_months() {
        let policy = RecurrencePolicy::default();
        let due = policy.follow_up_due(TASK_VACCINE, date(2024, 1, 10));
        assert_eq!(due, date(2025, 1, 10));
    }

    #[test]
    fn checkup_recurs_in_six_months() {
        let policy = RecurrencePolicy::default();
        assert_eq!(
            policy.follow_up_due(TASK_CHECKUP, date(2024, 1, 31)),
            date(2024, 7, 31)
        );
    }

    #[test]
    fn exam_recurs_in_three_months() {
        let policy = RecurrencePolicy::default();
        assert_eq!(
            policy.follow_up_due(TASK_EXAM, date(2024, 2, 1)),
            date(2024, 5, 1)
        );
    }

    #[test]
    fn treatment_recurs_in_seven_days() {
        let policy = RecurrencePolicy::default();
        assert_eq!(
            policy.follow_up_due(TASK_TREATMENT, date(2024, 1, 10)),
            date(2024, 1, 17)
        );
    }

    #[test]
    fn unlisted_types_fall_back_to_thirty_days() {
        let policy = RecurrencePolicy::default();
        assert_eq!(
            policy.follow_up_due(TASK_SURGERY, date(2024, 1, 1)),
            date(2024, 1, 31)
        );
        assert_eq!(
            policy.follow_up_due(TASK_OTHER, date(2024, 1, 1)),
            date(2024, 1, 31)
        );
    }

    #[test]
    fn month_arithmetic_clamps_to_month_end() {
        let policy = RecurrencePolicy::default();
        // Oct 31 + 3 months clamps to Jan 31; Nov 30 + 3 months is Feb 29 in a leap year.
        assert_eq!(
            policy.follow_up_due(TASK_EXAM, date(2023, 11, 30)),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn policy_round_trips_through_serde() {
        let policy = RecurrencePolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let back: RecurrencePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.interval_for(TASK_VACCINE), RecurrenceInterval::Months(12));
        assert_eq!(back.default_interval, RecurrenceInterval::Days(30));
    }

    // -----------------------------------------------------------------------
    // Working status validation
    // -----------------------------------------------------------------------

    #[test]
    fn non_terminal_statuses_are_settable() {
        for status in [TASK_SCHEDULED, TASK_IN_PROGRESS, TASK_PENDING_REVIEW, TASK_ON_HOLD] {
            assert!(validate_working_status(status).is_ok(), "status {status}");
        }
    }

    #[test]
    fn terminal_statuses_are_not_settable_directly() {
        assert!(validate_working_status(TASK_COMPLETED).is_err());
        assert!(validate_working_status(TASK_CANCELLED).is_err());
    }

    #[test]
    fn unknown_status_rejected() {
        assert!(validate_working_status("done").is_err());
    }

    // -----------------------------------------------------------------------
    // Compliance rate
    // -----------------------------------------------------------------------

    #[test]
    fn compliance_rate_basic() {
        assert_eq!(compliance_rate(3, 1), Some(0.75));
    }

    #[test]
    fn compliance_rate_all_completed() {
        assert_eq!(compliance_rate(5, 0), Some(1.0));
    }

    #[test]
    fn compliance_rate_empty_window_is_none() {
        assert_eq!(compliance_rate(0, 0), None);
    }
}
