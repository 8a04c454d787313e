//! Pure domain logic for the shelter workflow model.
//!
//! This crate has zero internal dependencies and performs no I/O, so it can
//! be used by the API/repository layer and any future worker or CLI tooling.
//! It owns the status vocabularies, the state machines, the due/overdue
//! classification, the recurrence policy table, and the metric formulas.

pub mod animal;
pub mod annotations;
pub mod application;
pub mod audit;
pub mod error;
pub mod medical;
pub mod metrics;
pub mod placement;
pub mod roles;
pub mod types;
