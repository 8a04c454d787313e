/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Date-only fields (intake dates, due dates, outcome dates) carry no
/// time-of-day component.
pub type DateOnly = chrono::NaiveDate;
