//! Shared setup helpers for repository integration tests.
//!
//! Every `#[sqlx::test]` gets a fresh migrated database, so each test seeds
//! exactly the tenant fixture it needs.

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::PgPool;

use pawhaven_core::types::DbId;
use pawhaven_db::models::animal::{Animal, CreateIntake};
use pawhaven_db::models::organization::CreateOrganization;
use pawhaven_db::models::person::{CreatePerson, Person};
use pawhaven_db::models::user::CreateUser;
use pawhaven_db::repositories::{AnimalRepo, OrganizationRepo, PersonRepo, UserRepo};

/// A seeded tenant: one organization and its admin user.
pub struct Tenant {
    pub org_id: DbId,
    pub admin_id: DbId,
}

/// Create a user and an organization with that user as admin.
pub async fn seed_tenant(pool: &PgPool, name: &str) -> Tenant {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{name}-admin@example.org"),
            // Argon2id PHC string for "correct-horse"; tests never verify it.
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2VlZHNhbHQ$seedhash".to_string(),
        },
    )
    .await
    .expect("seed user");

    let org = OrganizationRepo::create(
        pool,
        user.id,
        &CreateOrganization {
            name: name.to_string(),
            settings_json: None,
        },
    )
    .await
    .expect("seed organization");

    Tenant {
        org_id: org.id,
        admin_id: user.id,
    }
}

/// Intake an animal with sensible defaults.
pub async fn seed_animal(pool: &PgPool, tenant: &Tenant, name: &str) -> Animal {
    let (animal, _intake) = AnimalRepo::intake(
        pool,
        tenant.org_id,
        tenant.admin_id,
        &CreateIntake {
            name: name.to_string(),
            species: "dog".to_string(),
            intake_type: "stray".to_string(),
            intake_date: date(2024, 1, 5),
            medical_hold: false,
            kennel: None,
            microchip: None,
            attributes_json: None,
            notes: None,
        },
    )
    .await
    .expect("seed animal");
    animal
}

/// Create a person of the given type.
pub async fn seed_person(pool: &PgPool, tenant: &Tenant, name: &str, person_type: &str) -> Person {
    PersonRepo::create(
        pool,
        tenant.org_id,
        tenant.admin_id,
        &CreatePerson {
            person_type: person_type.to_string(),
            full_name: name.to_string(),
            email: None,
            phone: None,
            flags_json: None,
        },
    )
    .await
    .expect("seed person")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
