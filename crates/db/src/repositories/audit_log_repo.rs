//! Repository for the append-only `audit_log` table.
//!
//! Appends happen inside the caller's transaction so the log entry commits
//! or aborts together with the mutation it describes (log-or-nothing).
//! There is deliberately no update or delete method.

use sqlx::{PgPool, Postgres, Transaction};

use pawhaven_core::types::{DbId, Timestamp};

use crate::models::audit::{AuditLogEntry, AuditQuery, CreateAuditEntry};

/// Column list for audit_log queries.
const COLUMNS: &str = "\
    id, organization_id, actor_id, action, entity_type, entity_id, \
    details_json, created_at";

/// Provides append and query operations for the audit log.
pub struct AuditLogRepo;

impl AuditLogRepo {
    /// Append one entry inside an open transaction.
    pub async fn append_tx(
        tx: &mut Transaction<'_, Postgres>,
        entry: &CreateAuditEntry,
    ) -> Result<AuditLogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO audit_log \
                (organization_id, actor_id, action, entity_type, entity_id, details_json) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuditLogEntry>(&query)
            .bind(entry.organization_id)
            .bind(entry.actor_id)
            .bind(&entry.action)
            .bind(&entry.entity_type)
            .bind(entry.entity_id)
            .bind(&entry.details_json)
            .fetch_one(&mut **tx)
            .await
    }

    /// Query audit log entries with filtering and pagination, newest first.
    /// Always scoped to the given organization.
    pub async fn query(
        pool: &PgPool,
        organization_id: DbId,
        params: &AuditQuery,
    ) -> Result<Vec<AuditLogEntry>, sqlx::Error> {
        let limit = params.limit.unwrap_or(50).min(500);
        let offset = params.offset.unwrap_or(0);

        let (where_clause, bind_values, bind_idx) = build_filter(params);

        let query = format!(
            "SELECT {COLUMNS} FROM audit_log {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let mut q = sqlx::query_as::<_, AuditLogEntry>(&query).bind(organization_id);
        for val in &bind_values {
            q = val.bind_as(q);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count(
        pool: &PgPool,
        organization_id: DbId,
        params: &AuditQuery,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT FROM audit_log {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(organization_id);
        for val in &bind_values {
            q = val.bind_scalar(q);
        }
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers for dynamic query building
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built audit log queries.
enum BindValue {
    BigInt(DbId),
    Text(String),
    Timestamp(Timestamp),
}

impl BindValue {
    fn bind_as<'q, O>(
        &'q self,
        q: sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, O, sqlx::postgres::PgArguments> {
        match self {
            BindValue::BigInt(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Timestamp(v) => q.bind(*v),
        }
    }

    fn bind_scalar<'q>(
        &'q self,
        q: sqlx::query::QueryScalar<'q, Postgres, i64, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::QueryScalar<'q, Postgres, i64, sqlx::postgres::PgArguments> {
        match self {
            BindValue::BigInt(v) => q.bind(*v),
            BindValue::Text(v) => q.bind(v.as_str()),
            BindValue::Timestamp(v) => q.bind(*v),
        }
    }
}

/// Build a WHERE clause and bind values from `AuditQuery` filter parameters.
///
/// `$1` is always the organization id; returns `(where_clause, bind_values,
/// next_bind_index)`.
fn build_filter(params: &AuditQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["organization_id = $1".to_string()];
    let mut bind_idx = 2u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(actor_id) = params.actor_id {
        conditions.push(format!("actor_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(actor_id));
    }

    if let Some(ref action) = params.action {
        conditions.push(format!("action = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(action.clone()));
    }

    if let Some(ref entity_type) = params.entity_type {
        conditions.push(format!("entity_type = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(entity_type.clone()));
    }

    if let Some(entity_id) = params.entity_id {
        conditions.push(format!("entity_id = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::BigInt(entity_id));
    }

    if let Some(from) = params.from {
        conditions.push(format!("created_at >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(from));
    }

    if let Some(to) = params.to {
        conditions.push(format!("created_at <= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Timestamp(to));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    (where_clause, bind_values, bind_idx)
}
