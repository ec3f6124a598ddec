//! In-progress submission
//!
//! Holds one participant's answers while they fill in a form. The connection
//! list is bounded: adding past [`MAX_CONNECTIONS`] does nothing.

use crate::domain::aggregates::FormDefinition;
use crate::domain::services::{validate_and_normalize, ErrorMap, NormalizedPayload, RawValues};
use crate::domain::value_objects::{ConnectionField, ConnectionRecord, MAX_CONNECTIONS};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    values: RawValues,
    connections: Vec<ConnectionRecord>,
}

impl SubmissionDraft {
    /// Blank answers for every single-value field of `schema`.
    pub fn for_form(schema: &FormDefinition) -> Self {
        Self {
            values: schema.input_fields().map(|f| (f.name.clone(), String::new())).collect(),
            connections: Vec::new(),
        }
    }

    pub fn values(&self) -> &RawValues {
        &self.values
    }

    pub fn connections(&self) -> &[ConnectionRecord] {
        &self.connections
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn can_add_connection(&self) -> bool {
        self.connections.len() < MAX_CONNECTIONS
    }

    /// Append a blank connection row. Returns its index, or `None` when the list is full.
    pub fn add_connection(&mut self) -> Option<usize> {
        if !self.can_add_connection() {
            return None;
        }
        self.connections.push(ConnectionRecord::default());
        Some(self.connections.len() - 1)
    }

    pub fn remove_connection(&mut self, index: usize) -> Option<ConnectionRecord> {
        (index < self.connections.len()).then(|| self.connections.remove(index))
    }

    /// Returns false when `index` is out of range.
    pub fn set_connection_field(&mut self, index: usize, field: ConnectionField, value: impl Into<String>) -> bool {
        match self.connections.get_mut(index) {
            Some(record) => {
                record.set(field, value);
                true
            }
            None => false,
        }
    }

    pub fn validate(&self, schema: &FormDefinition) -> Result<NormalizedPayload, ErrorMap> {
        validate_and_normalize(schema, &self.values, &self.connections)
    }

    /// Clear answers after a successful submit, keeping the field keys.
    pub fn reset(&mut self) {
        self.values.values_mut().for_each(String::clear);
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FormInput;
    use chrono::{NaiveDate, Utc};

    fn schema() -> FormDefinition {
        FormDefinition::create(
            FormInput {
                admin_id: Some("admin".into()),
                event_name: "Mixer".into(),
                event_date: NaiveDate::from_ymd_opt(2026, 4, 2),
                ..FormInput::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_connection_list_is_bounded() {
        let mut draft = SubmissionDraft::for_form(&schema());
        for i in 0..MAX_CONNECTIONS {
            assert_eq!(draft.add_connection(), Some(i));
        }
        assert_eq!(draft.add_connection(), None);
        assert_eq!(draft.connections().len(), MAX_CONNECTIONS);

        draft.remove_connection(0);
        assert!(draft.can_add_connection());
        assert!(draft.remove_connection(10).is_none());
    }

    #[test]
    fn test_draft_validation_and_reset() {
        let form = schema();
        let mut draft = SubmissionDraft::for_form(&form);
        assert!(draft.values().contains_key("orgName"));
        assert!(!draft.values().contains_key("connections"));

        for (name, value) in [
            ("orgName", "acme"),
            ("sector", "Business"),
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("socialLink", "@ada"),
            ("phone", "555 123 4567"),
            ("addressStreet", "1 Main St"),
            ("addressCity", "Springfield"),
            ("addressState", "IL"),
            ("addressCountry", "USA"),
        ] {
            draft.set_value(name, value);
        }
        let idx = draft.add_connection().unwrap();
        assert!(draft.set_connection_field(idx, ConnectionField::Org, "Globex"));
        assert!(draft.validate(&form).unwrap_err().contains("connections"));

        draft.set_connection_field(idx, ConnectionField::Type, "Other");
        assert!(!draft.set_connection_field(idx + 1, ConnectionField::Type, "Other"));
        let payload = draft.validate(&form).unwrap();
        assert_eq!(payload.values["orgName"], "ACME");
        assert_eq!(payload.connections[0].connection_type, "OTHER");

        draft.reset();
        assert!(draft.connections().is_empty());
        assert_eq!(draft.values()["orgName"], "");
    }
}
