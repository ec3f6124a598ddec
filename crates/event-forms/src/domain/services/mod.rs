//! Domain services

pub mod validation;

pub use validation::{
    revalidate, validate_and_normalize, ErrorMap, FieldError, NormalizedPayload, RawValues,
};
