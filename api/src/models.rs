//! API Models

use event_forms::{ErrorMap, FormDefinition, SubmissionRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement for writes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Always `ok`
    pub status: String,
    /// Affected form or submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl StatusResponse {
    /// Acknowledge a write of `id`
    pub fn ok(id: impl Into<String>) -> Self {
        Self { status: "ok".into(), id: Some(id.into()) }
    }
}

/// Result of saving a form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    /// Always `ok`
    pub status: String,
    /// Stored form ID
    pub id: String,
    /// The form as stored
    pub form: FormDefinition,
}

impl SaveResponse {
    /// Acknowledge a saved form
    pub fn ok(form: FormDefinition) -> Self {
        Self { status: "ok".into(), id: form.id.clone(), form }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    /// Per-field validation messages, present when a submission is rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<ErrorMap>,
}

/// Stored responses for a form, newest first
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RowsResponse {
    /// Stored responses
    pub rows: Vec<SubmissionRecord>,
}
