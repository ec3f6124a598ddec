//! Outbound ports
//!
//! The form and response store the rest of the system is written against.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::{FormDefinition, SchemaError, SubmissionRecord};
use crate::domain::services::{ErrorMap, NormalizedPayload};

/// Form & response store port
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Insert or replace a form. `createdAt` survives re-saves of the same id.
    async fn save_form(&self, form: FormDefinition) -> Result<FormDefinition, StoreError>;

    async fn get_form(&self, id: &str) -> Result<FormDefinition, StoreError>;

    /// Delete a form together with all of its responses.
    async fn delete_form(&self, id: &str) -> Result<(), StoreError>;

    /// All forms, most recently updated first.
    async fn list_forms(&self) -> Result<Vec<FormDefinition>, StoreError>;

    /// Forms owned by `admin_id`, most recently updated first.
    async fn forms_for_admin(&self, admin_id: &str) -> Result<Vec<FormDefinition>, StoreError>;

    /// Append a response after re-checking it against the stored schema.
    async fn submit(&self, form_id: &str, payload: NormalizedPayload) -> Result<SubmissionRecord, StoreError>;

    /// Responses for a form, newest first.
    async fn responses(&self, form_id: &str) -> Result<Vec<SubmissionRecord>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Form not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] SchemaError),

    #[error("Submission rejected: {0}")]
    Rejected(ErrorMap),

    #[error("Storage error: {0}")]
    Storage(String),
}
