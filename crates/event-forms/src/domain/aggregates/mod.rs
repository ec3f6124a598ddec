//! Form Aggregate
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::services::NormalizedPayload;
use crate::domain::value_objects::{ConnectionRecord, FieldDefinition, FieldType};

/// Title used when a stored form carries none.
pub const DEFAULT_TITLE: &str = "Participant & Connections Form";

/// Name of the fixed field rendered as the repeatable connections section.
pub const CONNECTIONS_FIELD: &str = "connections";

/// Submission metadata columns of a response export. Extra fields may not use these names.
pub const METADATA_COLUMNS: [&str; 4] = ["submittedAt", "eventId", "eventName", "eventDate"];

/// The participant fields every form carries, in display order.
pub fn fixed_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::required("orgName", "Organization Name"),
        FieldDefinition::required("sector", "Sector"),
        FieldDefinition::required("firstName", "First Name"),
        FieldDefinition::required("lastName", "Last Name"),
        FieldDefinition::new("email", "Email", FieldType::Email, true),
        FieldDefinition::required("socialLink", "Social Media Link to Connect"),
        FieldDefinition::required("phone", "Phone Number"),
        FieldDefinition::required("addressStreet", "Street Address"),
        FieldDefinition::required("addressCity", "City"),
        FieldDefinition::required("addressState", "State"),
        FieldDefinition::required("addressCountry", "Country"),
        FieldDefinition::new(CONNECTIONS_FIELD, "Connections", FieldType::Connections, true),
    ]
}

/// An event's registration schema. `id` doubles as the public URL slug.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FormDefinition {
    pub id: String,
    pub admin_id: String,
    pub title: String,
    #[serde(alias = "baseRequired", default)]
    pub fixed_fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub extra_fields: Vec<FieldDefinition>,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What an admin sends when creating or re-saving a form.
///
/// A full [`FormDefinition`] document deserializes into this as well; the
/// store-owned parts (fixed fields, timestamps) are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FormInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub extra_fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
}

impl From<&FormDefinition> for FormInput {
    fn from(form: &FormDefinition) -> Self {
        Self {
            id: Some(form.id.clone()),
            event_id: Some(form.id.clone()),
            admin_id: Some(form.admin_id.clone()),
            title: Some(form.title.clone()),
            extra_fields: form.extra_fields.clone(),
            event_name: form.event_name.clone(),
            event_date: Some(form.event_date),
        }
    }
}

impl FormDefinition {
    /// Build a form from admin input. The id falls back to `eventId`, then to `EVT-<unix millis>`.
    pub fn create(input: FormInput, now: DateTime<Utc>) -> Result<Self, SchemaError> {
        let id = non_blank(input.id.as_deref())
            .or_else(|| non_blank(input.event_id.as_deref()))
            .unwrap_or_else(|| format!("EVT-{}", now.timestamp_millis()));
        let admin_id = non_blank(input.admin_id.as_deref()).ok_or(SchemaError::MissingAdmin)?;
        let event_name = input.event_name.trim().to_string();
        if event_name.is_empty() {
            return Err(SchemaError::MissingEventDetails);
        }
        let event_date = input.event_date.ok_or(SchemaError::MissingEventDetails)?;
        let title = non_blank(input.title.as_deref()).unwrap_or_else(|| event_name.clone());

        let mut form = Self {
            id,
            admin_id,
            title,
            fixed_fields: fixed_fields(),
            extra_fields: Vec::with_capacity(input.extra_fields.len()),
            event_name,
            event_date,
            created_at: now,
            updated_at: now,
        };
        for field in input.extra_fields {
            form.add_extra_field(field)?;
        }
        form.updated_at = now;
        Ok(form)
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            &self.title
        }
    }

    /// Fixed then extra fields.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fixed_fields.iter().chain(self.extra_fields.iter())
    }

    /// Fields that take a single text answer (everything but the connections section).
    pub fn input_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields().filter(|f| f.field_type != FieldType::Connections)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.name == name)
    }

    // =========================================================================
    // Extra field editor
    // =========================================================================

    pub fn add_extra_field(&mut self, field: FieldDefinition) -> Result<(), SchemaError> {
        let field = clean_field(field)?;
        self.ensure_name_free(&field.name, None)?;
        self.extra_fields.push(field);
        self.touch();
        Ok(())
    }

    pub fn update_extra_field(&mut self, index: usize, field: FieldDefinition) -> Result<(), SchemaError> {
        if index >= self.extra_fields.len() {
            return Err(SchemaError::NoSuchField(index));
        }
        let field = clean_field(field)?;
        self.ensure_name_free(&field.name, Some(index))?;
        self.extra_fields[index] = field;
        self.touch();
        Ok(())
    }

    pub fn remove_extra_field(&mut self, index: usize) -> Result<FieldDefinition, SchemaError> {
        if index >= self.extra_fields.len() {
            return Err(SchemaError::NoSuchField(index));
        }
        let removed = self.extra_fields.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Re-check the invariants a stored form must satisfy.
    pub fn check_schema(&self) -> Result<(), SchemaError> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::MissingId);
        }
        if self.admin_id.trim().is_empty() {
            return Err(SchemaError::MissingAdmin);
        }
        if self.event_name.trim().is_empty() {
            return Err(SchemaError::MissingEventDetails);
        }
        let mut seen: HashSet<&str> = self
            .fixed_fields
            .iter()
            .map(|f| f.name.as_str())
            .chain(METADATA_COLUMNS)
            .collect();
        for field in &self.extra_fields {
            if field.label.trim().is_empty() {
                return Err(SchemaError::BlankLabel);
            }
            if field.name.trim().is_empty() {
                return Err(SchemaError::BlankName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateName(field.name.clone()));
            }
        }
        Ok(())
    }

    fn ensure_name_free(&self, name: &str, editing: Option<usize>) -> Result<(), SchemaError> {
        let taken = METADATA_COLUMNS.contains(&name)
            || self.fixed_fields.iter().any(|f| f.name == name)
            || self
                .extra_fields
                .iter()
                .enumerate()
                .any(|(i, f)| Some(i) != editing && f.name == name);
        if taken {
            Err(SchemaError::DuplicateName(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

fn clean_field(field: FieldDefinition) -> Result<FieldDefinition, SchemaError> {
    let label = field.label.trim().to_string();
    let name = field.name.trim().to_string();
    if label.is_empty() {
        return Err(SchemaError::BlankLabel);
    }
    if name.is_empty() {
        return Err(SchemaError::BlankName);
    }
    if field.field_type == FieldType::Connections {
        return Err(SchemaError::ReservedType);
    }
    Ok(FieldDefinition { name, label, ..field })
}

/// One participant's stored, normalized response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub form_id: String,
    pub event_id: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub values: BTreeMap<String, String>,
    pub connections: Vec<ConnectionRecord>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn create(form_id: impl Into<String>, payload: NormalizedPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
            event_id: payload.event_id,
            event_name: payload.event_name,
            event_date: payload.event_date,
            values: payload.values,
            connections: payload.connections,
            submitted_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Form id cannot be empty")]
    MissingId,

    #[error("You must be logged in as an admin to save forms.")]
    MissingAdmin,

    #[error("Please enter Event Name and Date of Event.")]
    MissingEventDetails,

    #[error("Field label cannot be empty")]
    BlankLabel,

    #[error("Field name cannot be empty")]
    BlankName,

    #[error("Field name already in use: {0}")]
    DuplicateName(String),

    #[error("Extra fields cannot use the connections type")]
    ReservedType,

    #[error("No extra field at position {0}")]
    NoSuchField(usize),
}
