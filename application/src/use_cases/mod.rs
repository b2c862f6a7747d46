//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod select_model;
pub mod verify_ensemble;
