//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod animal;
pub mod annotation;
pub mod application;
pub mod audit;
pub mod medical;
pub mod membership;
pub mod metrics;
pub mod organization;
pub mod person;
pub mod placement;
pub mod user;
