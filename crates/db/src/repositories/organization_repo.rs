//! Repository for the `organizations` table.

use sqlx::PgPool;

use pawhaven_core::audit::{actions, creation_snapshot, entity_types};
use pawhaven_core::roles::ROLE_ADMIN;
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::audit::CreateAuditEntry;
use crate::models::organization::{CreateOrganization, Organization};
use crate::repositories::AuditLogRepo;

/// Column list for organizations queries.
const COLUMNS: &str = "id, name, settings_json, created_at, updated_at";

/// Provides create and lookup operations for tenant organizations.
pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Create an organization with its creator as the first admin member.
    ///
    /// Runs in one transaction: organization insert, admin membership
    /// insert, audit append.
    pub async fn create(
        pool: &PgPool,
        creator_id: DbId,
        input: &CreateOrganization,
    ) -> DbResult<Organization> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO organizations (name, settings_json) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        let org = sqlx::query_as::<_, Organization>(&query)
            .bind(&input.name)
            .bind(
                input
                    .settings_json
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({})),
            )
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, $3)")
            .bind(creator_id)
            .bind(org.id)
            .bind(ROLE_ADMIN)
            .execute(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id: org.id,
                actor_id: Some(creator_id),
                action: actions::ORG_CREATE.to_string(),
                entity_type: entity_types::ORGANIZATION.to_string(),
                entity_id: org.id,
                details_json: creation_snapshot(&serde_json::json!({ "name": org.name })),
            },
        )
        .await?;

        tx.commit().await?;
        tracing::info!(org_id = org.id, creator_id, "Organization created");
        Ok(org)
    }

    /// Find an organization by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Organization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM organizations WHERE id = $1");
        sqlx::query_as::<_, Organization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List organizations the given user is a member of.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Organization>, sqlx::Error> {
        sqlx::query_as::<_, Organization>(
            "SELECT o.id, o.name, o.settings_json, o.created_at, o.updated_at \
             FROM organizations o \
             JOIN memberships m ON m.organization_id = o.id \
             WHERE m.user_id = $1 \
             ORDER BY o.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
