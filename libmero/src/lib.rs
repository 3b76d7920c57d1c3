//! This is a library that provides objects and functionality to help you catalog biological
//! specimen samples (coral fragments, mollusks, etc.) and query them in memory.
//!
//! The [store::SampleStore] holds the committed [sample::Sample] records for the lifetime of a
//! session. New records and edits go through a [sample::Draft], which is validated and turned into
//! a sample with a derived identifier (see [sample::derive_id]). The [view::ViewParams] type
//! describes which samples to display and in what order.

pub mod core;
pub mod sample;
pub mod store;
pub mod taxonomy;
pub mod view;

pub use crate::core::error::Error;
pub use crate::core::error::Result;
pub use crate::core::error::ValidationError;
