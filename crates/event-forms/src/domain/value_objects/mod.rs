//! Forms value objects
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of connection records a single submission may carry.
pub const MAX_CONNECTIONS: usize = 5;

/// Sector choices offered to participants. The validator only requires a non-blank value.
pub const SECTOR_OPTIONS: [&str; 6] = [
    "Education",
    "Business",
    "Non-profit",
    "Government",
    "Community",
    "Other",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Number,
    Date,
    Connections,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Connections => "connections",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "email" => Ok(Self::Email),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "connections" => Ok(Self::Connections),
            other => Err(format!("unknown field type: {other}")),
        }
    }
}

/// One question on a form, keyed by `name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldDefinition {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self { name: name.into(), label: label.into(), field_type, required }
    }

    pub fn required(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldType::Text, true)
    }
}

/// How a participant knows a connected organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionType {
    MetFirstTime,
    Reconnected,
    SharedResources,
    FundingPartnership,
    Referral,
    Other,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 6] = [
        Self::MetFirstTime,
        Self::Reconnected,
        Self::SharedResources,
        Self::FundingPartnership,
        Self::Referral,
        Self::Other,
    ];

    /// Label shown to participants and submitted as `connectionType`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MetFirstTime => "Met for the first time",
            Self::Reconnected => "Reconnected / existing relationship",
            Self::SharedResources => "Shared info / resources",
            Self::FundingPartnership => "Funding / partnership",
            Self::Referral => "Referral / introduced",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup by label.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|t| t.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A relationship to another organization, as entered by a participant.
///
/// Sub-fields are kept as raw strings: a blank record is legal input and
/// `connection_type` is only checked for presence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectionRecord {
    #[serde(default)]
    pub connection_org: String,
    #[serde(default)]
    pub connection_type: String,
    #[serde(default)]
    pub other_text: String,
}

impl ConnectionRecord {
    pub fn new(org: impl Into<String>, connection_type: impl Into<String>, other_text: impl Into<String>) -> Self {
        Self {
            connection_org: org.into(),
            connection_type: connection_type.into(),
            other_text: other_text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.connection_org.trim().is_empty()
            && self.connection_type.trim().is_empty()
            && self.other_text.trim().is_empty()
    }

    /// Started but missing the organization or the type.
    pub fn is_half_filled(&self) -> bool {
        !self.is_blank()
            && (self.connection_org.trim().is_empty() || self.connection_type.trim().is_empty())
    }

    pub fn set(&mut self, field: ConnectionField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ConnectionField::Org => self.connection_org = value,
            ConnectionField::Type => self.connection_type = value,
            ConnectionField::OtherText => self.other_text = value,
        }
    }

    pub(crate) fn normalized(&self) -> Self {
        Self {
            connection_org: normalize_text(&self.connection_org),
            connection_type: normalize_text(&self.connection_type),
            other_text: normalize_text(&self.other_text),
        }
    }
}

/// Addressable sub-field of a [`ConnectionRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionField {
    Org,
    Type,
    OtherText,
}

/// Trim and uppercase, the storage form of every submitted string.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_blankness() {
        assert!(ConnectionRecord::default().is_blank());
        assert!(ConnectionRecord::new("  ", "", " ").is_blank());
        assert!(ConnectionRecord::new("Acme", "", "").is_half_filled());
        assert!(ConnectionRecord::new("", "", "met at lunch").is_half_filled());
        assert!(!ConnectionRecord::new("Acme", "Other", "").is_half_filled());
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("Email".parse::<FieldType>(), Ok(FieldType::Email));
        assert_eq!(" date ".parse::<FieldType>(), Ok(FieldType::Date));
        assert!("checkbox".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_connection_type_labels() {
        assert_eq!(ConnectionType::from_label("other"), Some(ConnectionType::Other));
        assert_eq!(
            ConnectionType::from_label(" Referral / introduced "),
            Some(ConnectionType::Referral)
        );
        assert_eq!(ConnectionType::from_label("Friends"), None);
    }

    #[test]
    fn test_field_definition_wire_format() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"name":"role","label":"Role","type":"text","required":true}"#).unwrap();
        assert_eq!(field, FieldDefinition::required("role", "Role"));

        let json = serde_json::to_value(ConnectionRecord::new("Acme", "Other", "x")).unwrap();
        assert_eq!(json["connectionOrg"], "Acme");
        assert_eq!(json["otherText"], "x");
    }
}
