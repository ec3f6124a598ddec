//! Submission validation and normalization
//!
//! Checks a participant's raw answers against a form schema. Every rule runs
//! on every attempt, so the caller gets the complete set of problems at once:
//!
//! 1. email: required, `local@domain.tld` shape
//! 2. phone: required, 7-15 digits once punctuation is stripped
//! 3. sector: required
//! 4. remaining required fixed fields
//! 5. required extra fields
//! 6. connections: no half-filled records, at most [`MAX_CONNECTIONS`]
//!
//! Only a clean input is normalized (trimmed and uppercased) into a
//! [`NormalizedPayload`].

use chrono::NaiveDate;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use crate::domain::aggregates::{FormDefinition, CONNECTIONS_FIELD};
use crate::domain::value_objects::{normalize_text, ConnectionRecord, MAX_CONNECTIONS};

/// Raw answers keyed by field name.
pub type RawValues = BTreeMap<String, String>;

const EMAIL: &str = "email";
const PHONE: &str = "phone";
const SECTOR: &str = "sector";

const PHONE_DIGITS_MIN: usize = 7;
const PHONE_DIGITS_MAX: usize = 15;

/// Fields with dedicated rules, skipped by the generic required check.
const SPECIAL_FIELDS: [&str; 4] = [EMAIL, PHONE, SECTOR, CONNECTIONS_FIELD];

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

/// A submission that passed validation, ready to be stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NormalizedPayload {
    pub event_id: String,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub values: BTreeMap<String, String>,
    #[serde(default)]
    pub connections: Vec<ConnectionRecord>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field-keyed validation messages, in the order the rules raised them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorMap {
    errors: Vec<FieldError>,
}

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`, replacing any earlier one in place.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.errors.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.message = message,
            None => self.errors.push(FieldError { field, message }),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// The consolidated list shown above the form.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl fmt::Display for ErrorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(" "))
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for e in &self.errors {
            map.serialize_entry(&e.field, &e.message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ErrorMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ErrorMapVisitor;

        impl<'de> Visitor<'de> for ErrorMapVisitor {
            type Value = ErrorMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to messages")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ErrorMap, A::Error> {
                let mut errors = ErrorMap::new();
                while let Some((field, message)) = access.next_entry::<String, String>()? {
                    errors.insert(field, message);
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(ErrorMapVisitor)
    }
}

fn answer<'a>(values: &'a RawValues, name: &str) -> &'a str {
    values.get(name).map(|v| v.trim()).unwrap_or("")
}

fn is_valid_email(value: &str) -> bool {
    value.is_ascii() && email_pattern().is_match(value)
}

fn phone_digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Validate raw answers against `schema` and, if nothing is wrong, normalize them.
///
/// Keys that are not fields of the schema are dropped from the payload;
/// schema fields with no answer are stored as empty strings.
pub fn validate_and_normalize(
    schema: &FormDefinition,
    raw_values: &RawValues,
    raw_connections: &[ConnectionRecord],
) -> Result<NormalizedPayload, ErrorMap> {
    let mut errors = ErrorMap::new();

    let email = answer(raw_values, EMAIL);
    if email.is_empty() {
        errors.insert(EMAIL, "Email is required.");
    } else if !is_valid_email(email) {
        errors.insert(
            EMAIL,
            "Please enter a valid email address (for example: NAME@EXAMPLE.COM).",
        );
    }

    let phone = answer(raw_values, PHONE);
    if phone.is_empty() {
        errors.insert(PHONE, "Phone number is required.");
    } else if !(PHONE_DIGITS_MIN..=PHONE_DIGITS_MAX).contains(&phone_digit_count(phone)) {
        errors.insert(PHONE, "Phone number must be 7-15 digits.");
    }

    if answer(raw_values, SECTOR).is_empty() {
        errors.insert(SECTOR, "Sector is required.");
    }

    let required = schema
        .fixed_fields
        .iter()
        .filter(|f| !SPECIAL_FIELDS.contains(&f.name.as_str()))
        .chain(schema.extra_fields.iter())
        .filter(|f| f.required);
    for field in required {
        if answer(raw_values, &field.name).is_empty() {
            errors.insert(field.name.clone(), format!("{} is required.", field.label));
        }
    }

    if raw_connections.len() > MAX_CONNECTIONS {
        errors.insert(
            CONNECTIONS_FIELD,
            format!("You can record at most {MAX_CONNECTIONS} connections."),
        );
    } else if raw_connections.iter().any(ConnectionRecord::is_half_filled) {
        errors.insert(
            CONNECTIONS_FIELD,
            "For each connection you add, please fill BOTH Connection Organization and Connection Type.",
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let values = schema
        .input_fields()
        .map(|f| {
            let value = raw_values.get(&f.name).map(|v| normalize_text(v)).unwrap_or_default();
            (f.name.clone(), value)
        })
        .collect();

    Ok(NormalizedPayload {
        event_id: schema.id.clone(),
        event_name: normalize_text(&schema.event_name),
        event_date: schema.event_date,
        values,
        connections: raw_connections.iter().map(ConnectionRecord::normalized).collect(),
    })
}

/// Server-side check of a payload a client claims to have validated.
///
/// Normalization is idempotent, so a payload produced by
/// [`validate_and_normalize`] for this schema passes unchanged; the returned
/// payload is the one to store.
pub fn revalidate(schema: &FormDefinition, payload: &NormalizedPayload) -> Result<NormalizedPayload, ErrorMap> {
    if payload.event_id != schema.id {
        let mut errors = ErrorMap::new();
        errors.insert("eventId", format!("Submission is for event {}, not {}.", payload.event_id, schema.id));
        return Err(errors);
    }
    validate_and_normalize(schema, &payload.values, &payload.connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::FormInput;
    use crate::domain::value_objects::FieldDefinition;
    use chrono::Utc;

    fn schema() -> FormDefinition {
        FormDefinition::create(
            FormInput {
                id: Some("EVT-1".into()),
                admin_id: Some("admin".into()),
                event_name: " Spring mixer ".into(),
                event_date: NaiveDate::from_ymd_opt(2026, 4, 2),
                ..FormInput::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn valid_values() -> RawValues {
        [
            ("orgName", "  acme corp  "),
            ("sector", "Business"),
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("socialLink", "linkedin.com/in/ada"),
            ("phone", " (555) 123-4567 "),
            ("addressStreet", "1 Main St"),
            ("addressCity", "Springfield"),
            ("addressState", "IL"),
            ("addressCountry", "USA"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn with(mut values: RawValues, key: &str, value: &str) -> RawValues {
        values.insert(key.into(), value.into());
        values
    }

    #[test]
    fn test_valid_input_normalizes() {
        let payload = validate_and_normalize(&schema(), &valid_values(), &[]).unwrap();
        assert_eq!(payload.values["orgName"], "ACME CORP");
        assert_eq!(payload.values["email"], "ADA@EXAMPLE.COM");
        assert_eq!(payload.values["phone"], "(555) 123-4567");
        assert_eq!(payload.event_id, "EVT-1");
        assert_eq!(payload.event_name, "SPRING MIXER");
        assert!(!payload.values.contains_key("connections"));
    }

    #[test]
    fn test_unknown_keys_are_dropped_and_missing_optional_fields_blank() {
        let mut form = schema();
        form.add_extra_field(FieldDefinition::new("diet", "Dietary needs", Default::default(), false))
            .unwrap();
        let values = with(valid_values(), "injected", "x");
        let payload = validate_and_normalize(&form, &values, &[]).unwrap();
        assert!(!payload.values.contains_key("injected"));
        assert_eq!(payload.values["diet"], "");
    }

    #[test]
    fn test_missing_email() {
        let mut values = valid_values();
        values.remove("email");
        let errors = validate_and_normalize(&schema(), &values, &[]).unwrap_err();
        assert_eq!(errors.get("email"), Some("Email is required."));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_email_shapes() {
        for bad in ["ada", "ada@example", "ada@@example.com", "a da@example.com", "ada@exämple.com", "ada@example."] {
            let errors = validate_and_normalize(&schema(), &with(valid_values(), "email", bad), &[]).unwrap_err();
            assert!(errors.contains("email"), "{bad} should be rejected");
        }
        assert!(validate_and_normalize(&schema(), &with(valid_values(), "email", "a.b@mail.example.org"), &[]).is_ok());
    }

    #[test]
    fn test_phone_digit_bounds() {
        assert!(validate_and_normalize(&schema(), &with(valid_values(), "phone", "123-456-7"), &[]).is_ok());
        assert!(validate_and_normalize(&schema(), &with(valid_values(), "phone", "123-4567"), &[]).is_ok());

        let short = validate_and_normalize(&schema(), &with(valid_values(), "phone", "123456"), &[]).unwrap_err();
        assert!(short.contains("phone"));

        let long = validate_and_normalize(&schema(), &with(valid_values(), "phone", "1234567890123456"), &[]).unwrap_err();
        assert!(long.contains("phone"));

        let blank = validate_and_normalize(&schema(), &with(valid_values(), "phone", "   "), &[]).unwrap_err();
        assert_eq!(blank.get("phone"), Some("Phone number is required."));
    }

    #[test]
    fn test_all_errors_collected_in_rule_order() {
        let mut form = schema();
        form.add_extra_field(FieldDefinition::required("role", "Role")).unwrap();
        let connections = [ConnectionRecord::new("Acme", "", "")];
        let errors = validate_and_normalize(&form, &RawValues::new(), &connections).unwrap_err();

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(&fields[..3], &["email", "phone", "sector"]);
        assert_eq!(fields[3], "orgName");
        assert_eq!(errors.get("role"), Some("Role is required."));
        assert_eq!(fields.last(), Some(&"connections"));
        assert_eq!(errors.len(), 3 + 8 + 1 + 1);
    }

    #[test]
    fn test_required_extra_field() {
        let mut form = schema();
        form.add_extra_field(FieldDefinition::required("role", "Role")).unwrap();
        let errors = validate_and_normalize(&form, &with(valid_values(), "role", ""), &[]).unwrap_err();
        assert!(errors.contains("role"));
    }

    #[test]
    fn test_connection_rules() {
        let form = schema();
        let half = [ConnectionRecord::new("Acme", "", "")];
        let errors = validate_and_normalize(&form, &valid_values(), &half).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("connections"));

        let blank = [ConnectionRecord::default()];
        assert!(validate_and_normalize(&form, &valid_values(), &blank).is_ok());

        let full = [ConnectionRecord::new(" Acme ", "Referral / introduced", "")];
        let payload = validate_and_normalize(&form, &valid_values(), &full).unwrap();
        assert_eq!(payload.connections[0].connection_org, "ACME");
        assert_eq!(payload.connections[0].connection_type, "REFERRAL / INTRODUCED");

        // "Other" does not make the description mandatory
        let other = [ConnectionRecord::new("Acme", "Other", "")];
        assert!(validate_and_normalize(&form, &valid_values(), &other).is_ok());
    }

    #[test]
    fn test_two_half_filled_records_raise_one_error() {
        let records = [ConnectionRecord::new("Acme", "", ""), ConnectionRecord::new("", "Other", "")];
        let errors = validate_and_normalize(&schema(), &valid_values(), &records).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_too_many_connections() {
        let records = vec![ConnectionRecord::new("Acme", "Other", ""); MAX_CONNECTIONS + 1];
        let errors = validate_and_normalize(&schema(), &valid_values(), &records).unwrap_err();
        assert!(errors.contains("connections"));
    }

    #[test]
    fn test_revalidate_accepts_own_output() {
        let form = schema();
        let payload = validate_and_normalize(&form, &valid_values(), &[]).unwrap();
        assert_eq!(revalidate(&form, &payload).unwrap(), payload);

        let mut moved = payload;
        moved.event_id = "EVT-2".into();
        assert!(revalidate(&form, &moved).unwrap_err().contains("eventId"));
    }

    #[test]
    fn test_error_map_keeps_order_on_the_wire() {
        let mut errors = ErrorMap::new();
        errors.insert("phone", "p");
        errors.insert("email", "e");
        errors.insert("phone", "p2");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"phone":"p2","email":"e"}"#);
        let back: ErrorMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, errors);
    }
}
