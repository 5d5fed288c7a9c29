//! SQL generation
//!
//! - [`coerce`]: lenient number and date reading
//! - [`formatter`]: cell values to SQL tokens
//! - [`sql`]: statement assembly from validated mappings
//! - [`generic`]: statement assembly from row keys
//! - [`batch`]: merging saved work records and spreadsheet configs
//! - [`generator`]: validating entry points

pub mod batch;
pub mod coerce;
pub mod formatter;
pub mod generator;
pub mod generic;
pub mod sql;

use crate::validation::ValidationError;

/// Errors merging work records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("no work records found")]
    NoRecordsFound,
    #[error("no work record carries a target table and mapping")]
    MissingMapping,
    #[error("no spreadsheet configs found")]
    NoConfigsFound,
}

/// Error during statement generation
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),
}

/// Result type for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

// Re-export for convenience
pub use batch::{BatchGeneration, MergedConfigs, merge_excel_configs, merge_work_records};
pub use formatter::{LiteralEmbeddingFormatter, ValueFormatter};
pub use generator::{SqlGenerator, generate_from_work_records, generate_sql, generate_sql_generic};
pub use sql::StatementBuilder;
