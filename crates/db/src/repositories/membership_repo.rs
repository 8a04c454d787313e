//! Repository for the `memberships` table: the authorization source.

use sqlx::PgPool;

use pawhaven_core::audit::{actions, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::roles::{satisfies, validate_role};
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::audit::CreateAuditEntry;
use crate::models::membership::{CreateMembership, MemberWithEmail, Membership};
use crate::repositories::AuditLogRepo;

/// Column list for memberships queries.
const COLUMNS: &str = "id, user_id, organization_id, role, created_at, updated_at";

/// Provides authorization lookups and member management.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Resolve the caller's membership and check it against a required role.
    ///
    /// Pure lookup, no side effects. Fails `NotAMember` when no membership
    /// row exists for the pair, `Forbidden` when the member's rank is below
    /// the requirement.
    pub async fn authorize(
        pool: &PgPool,
        user_id: DbId,
        organization_id: DbId,
        required_role: &str,
    ) -> DbResult<Membership> {
        let membership = Self::find(pool, user_id, organization_id)
            .await?
            .ok_or(CoreError::NotAMember {
                user_id,
                organization_id,
            })?;

        if !satisfies(&membership.role, required_role) {
            return Err(CoreError::Forbidden(format!(
                "Requires at least the '{required_role}' role"
            ))
            .into());
        }

        Ok(membership)
    }

    /// Find the membership row for a (user, organization) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        organization_id: DbId,
    ) -> Result<Option<Membership>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM memberships WHERE user_id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a member to an organization. Audited.
    ///
    /// The user must already exist globally; the unique constraint on
    /// (user, organization) surfaces duplicates as a 409.
    pub async fn add_member(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        input: &CreateMembership,
    ) -> DbResult<Membership> {
        validate_role(&input.role)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO memberships (user_id, organization_id, role) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let membership = sqlx::query_as::<_, Membership>(&query)
            .bind(input.user_id)
            .bind(organization_id)
            .bind(&input.role)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::MEMBER_ADD.to_string(),
                entity_type: entity_types::MEMBERSHIP.to_string(),
                entity_id: membership.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "user_id": membership.user_id,
                    "role": membership.role,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(membership)
    }

    /// List members of an organization with their emails.
    pub async fn list_members(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<MemberWithEmail>, sqlx::Error> {
        sqlx::query_as::<_, MemberWithEmail>(
            "SELECT m.id, m.user_id, m.organization_id, m.role, u.email, m.created_at \
             FROM memberships m \
             JOIN users u ON u.id = m.user_id \
             WHERE m.organization_id = $1 \
             ORDER BY u.email",
        )
        .bind(organization_id)
        .fetch_all(pool)
        .await
    }

    /// Remove a member from an organization. Audited.
    ///
    /// Fails `NotFound` when no membership exists for the pair.
    pub async fn remove_member(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        user_id: DbId,
    ) -> DbResult<()> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM memberships WHERE user_id = $1 AND organization_id = $2 \
             RETURNING {COLUMNS}"
        );
        let removed = sqlx::query_as::<_, Membership>(&query)
            .bind(user_id)
            .bind(organization_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Membership",
                id: user_id,
            })?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::MEMBER_REMOVE.to_string(),
                entity_type: entity_types::MEMBERSHIP.to_string(),
                entity_id: removed.id,
                details_json: serde_json::json!({
                    "before": { "user_id": removed.user_id, "role": removed.role },
                    "after": null,
                }),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
