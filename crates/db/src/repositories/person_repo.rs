//! Repository for the `people` table (external contacts).

use sqlx::PgPool;

use pawhaven_core::audit::{actions, change_snapshot, creation_snapshot, entity_types};
use pawhaven_core::error::CoreError;
use pawhaven_core::types::DbId;

use crate::error::DbResult;
use crate::models::audit::CreateAuditEntry;
use crate::models::person::{CreatePerson, Person, UpdatePerson};
use crate::repositories::AuditLogRepo;

/// Column list for people queries.
const COLUMNS: &str = "\
    id, organization_id, person_type, full_name, email, phone, flags_json, \
    created_at, updated_at";

/// Valid person types; must match the CHECK constraint on `people.person_type`.
const VALID_PERSON_TYPES: &[&str] = &["adopter", "foster", "volunteer", "donor", "staff"];

/// Provides CRUD operations for external contacts.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person. Audited.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        input: &CreatePerson,
    ) -> DbResult<Person> {
        validate_person_type(&input.person_type)?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO people \
                (organization_id, person_type, full_name, email, phone, flags_json) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let person = sqlx::query_as::<_, Person>(&query)
            .bind(organization_id)
            .bind(&input.person_type)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(
                input
                    .flags_json
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({})),
            )
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::PERSON_CREATE.to_string(),
                entity_type: entity_types::PERSON.to_string(),
                entity_id: person.id,
                details_json: creation_snapshot(&serde_json::json!({
                    "person_type": person.person_type,
                    "full_name": person.full_name,
                })),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(person)
    }

    /// Find a person by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List a tenant's people, optionally filtered by type.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        person_type: Option<&str>,
    ) -> Result<Vec<Person>, sqlx::Error> {
        match person_type {
            Some(person_type) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM people \
                     WHERE organization_id = $1 AND person_type = $2 \
                     ORDER BY full_name"
                );
                sqlx::query_as::<_, Person>(&query)
                    .bind(organization_id)
                    .bind(person_type)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM people \
                     WHERE organization_id = $1 \
                     ORDER BY full_name"
                );
                sqlx::query_as::<_, Person>(&query)
                    .bind(organization_id)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Update a person. All fields optional; audited with a field diff.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        actor_id: DbId,
        id: DbId,
        input: &UpdatePerson,
    ) -> DbResult<Person> {
        if let Some(ref person_type) = input.person_type {
            validate_person_type(person_type)?;
        }

        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM people WHERE id = $1 AND organization_id = $2 FOR UPDATE"
        );
        let before = sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Person",
                id,
            })?;

        let query = format!(
            "UPDATE people SET \
                person_type = COALESCE($1, person_type), \
                full_name = COALESCE($2, full_name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                flags_json = COALESCE($5, flags_json), \
                updated_at = now() \
             WHERE id = $6 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Person>(&query)
            .bind(&input.person_type)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.flags_json)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        AuditLogRepo::append_tx(
            &mut tx,
            &CreateAuditEntry {
                organization_id,
                actor_id: Some(actor_id),
                action: actions::PERSON_UPDATE.to_string(),
                entity_type: entity_types::PERSON.to_string(),
                entity_id: id,
                details_json: change_snapshot(
                    &serde_json::json!({
                        "person_type": before.person_type,
                        "full_name": before.full_name,
                        "flags_json": before.flags_json,
                    }),
                    &serde_json::json!({
                        "person_type": updated.person_type,
                        "full_name": updated.full_name,
                        "flags_json": updated.flags_json,
                    }),
                ),
            },
        )
        .await?;

        tx.commit().await?;
        Ok(updated)
    }
}

fn validate_person_type(person_type: &str) -> Result<(), CoreError> {
    if VALID_PERSON_TYPES.contains(&person_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid person type '{person_type}'. Must be one of: {}",
            VALID_PERSON_TYPES.join(", ")
        )))
    }
}
