//! Application layer

pub mod draft;

pub use draft::SubmissionDraft;
