//! Event forms domain model
//!
//! - **Value objects**: field definitions, connection records
//! - **Aggregates**: `FormDefinition` (with its extra-field editor), `SubmissionRecord`
//! - **Services**: validation and normalization of submissions

pub mod value_objects;
pub mod aggregates;
pub mod services;

pub use value_objects::*;
pub use aggregates::*;
pub use services::*;
