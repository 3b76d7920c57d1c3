//! Core infrastructure for managing and querying the sample catalog.
pub mod error;
pub mod query;
pub mod timestamp;
