// Common utilities and shared types used across the crate

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at module root for convenience
pub use error::{HarvestError, NoMatchError, Result};
pub use types::{FieldSpec, FieldType, FieldValue, Record};
