//! Event Forms
//!
//! Registration form builder for events. Each event gets a participant &
//! connections form: a constant set of fixed participant fields, extra
//! questions defined by the owning admin, and up to five "connection"
//! records linking the participant to other organizations.
//!
//! ## Features
//! - Form schema model with an extra-field editor
//! - Validation and normalization of public submissions
//! - Bounded submission drafts
//! - Form & response store port with an in-memory adapter
//! - CSV export of responses

pub mod domain;
pub mod application;
pub mod ports;
pub mod infrastructure;
pub mod export;

pub use application::SubmissionDraft;
pub use domain::{
    fixed_fields, validate_and_normalize, ConnectionField, ConnectionRecord, ConnectionType,
    ErrorMap, FieldDefinition, FieldType, FormDefinition, FormInput, NormalizedPayload, RawValues,
    SchemaError, SubmissionRecord, MAX_CONNECTIONS, SECTOR_OPTIONS,
};
pub use export::{export_csv, ExportError};
pub use infrastructure::InMemoryFormStore;
pub use ports::{FormStore, StoreError};
