//! Infrastructure adapters

pub mod persistence;

pub use persistence::InMemoryFormStore;
