//! Validation functionality
//!
//! Provides validation logic for:
//! - Generation requests (table name, data, operation)
//! - Column mappings (usable sources, key fields per operation)

pub mod mapping;

pub use mapping::{
    ResolvedMapping, ValidatedMappings, ValidationError, ValidationResult, validate_generic,
    validate_mappings, validate_request,
};
