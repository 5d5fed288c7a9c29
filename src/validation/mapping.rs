//! Mapping and request validation
//!
//! Checks a generation request before any statement text is produced and
//! resolves each usable mapping into a typed form: the column type tag and
//! transform are parsed here once, never per value.

use thiserror::Error;
use tracing::debug;

use crate::models::{
    CellValue, ColumnMapping, ColumnType, GenerationRequest, GenericOperation, GenericOptions,
    OperationType, Row, TransformKind,
};

/// Errors raised for malformed or incomplete generation requests
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("table name is required")]
    MissingTableName,

    #[error("data cannot be empty")]
    EmptyData,

    #[error("unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("no valid column mapping: every mapping lacks both a source column and a default value")]
    NoValidMapping,

    #[error("UPDATE requires at least one key field")]
    MissingKeyField,

    #[error("UPDATE requires at least one field to update")]
    MissingUpdateField,

    #[error("{0} requires primary keys")]
    MissingPrimaryKeys(&'static str),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A usable mapping with its type tag and transform resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMapping {
    pub db_column: String,
    pub source_column: Option<String>,
    /// Truthy default only
    pub default_value: Option<serde_json::Value>,
    pub column_type: ColumnType,
    /// `None` for both "no transform" and unknown transform names
    pub transform: Option<TransformKind>,
    pub is_key: bool,
}

impl ResolvedMapping {
    /// Resolve a mapping, returning `None` when it has no data source
    pub fn resolve(mapping: &ColumnMapping) -> Option<Self> {
        if !mapping.is_usable() {
            return None;
        }
        Some(Self {
            db_column: mapping.db_column.clone(),
            source_column: mapping.source_column().map(str::to_string),
            default_value: mapping.effective_default().cloned(),
            column_type: ColumnType::classify(mapping.column_type.as_deref()),
            transform: mapping.transform.as_deref().and_then(TransformKind::parse),
            is_key: mapping.is_key,
        })
    }

    /// Pick this column's value from a row.
    ///
    /// A present source cell wins even when it is null; otherwise the default
    /// applies; otherwise the value is null.
    pub fn value_for(&self, row: &Row) -> CellValue {
        if let Some(source) = &self.source_column
            && let Some(value) = row.get(source)
        {
            return CellValue::from(value);
        }
        self.default_value
            .as_ref()
            .map(CellValue::from)
            .unwrap_or(CellValue::Null)
    }
}

/// The usable mappings of a request, in their original order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMappings {
    pub operation: OperationType,
    pub columns: Vec<ResolvedMapping>,
}

impl ValidatedMappings {
    /// Mappings flagged as keys
    pub fn keys(&self) -> impl Iterator<Item = &ResolvedMapping> {
        self.columns.iter().filter(|m| m.is_key)
    }

    /// Mappings not flagged as keys
    pub fn non_keys(&self) -> impl Iterator<Item = &ResolvedMapping> {
        self.columns.iter().filter(|m| !m.is_key)
    }
}

/// Validate a mapping list for an operation.
///
/// # Rules
///
/// - `insert` / `upsert`: at least one usable mapping
/// - `update`: at least one usable key mapping, then at least one usable
///   non-key mapping
/// - `delete`: at least one usable key mapping
///
/// Mappings without a source column or default are dropped silently.
pub fn validate_mappings(
    mapping: &[ColumnMapping],
    operation: OperationType,
) -> ValidationResult<ValidatedMappings> {
    let columns: Vec<ResolvedMapping> = mapping.iter().filter_map(ResolvedMapping::resolve).collect();

    if columns.len() < mapping.len() {
        debug!(
            "Dropped {} mapping(s) with no source column or default",
            mapping.len() - columns.len()
        );
    }

    let validated = ValidatedMappings { operation, columns };

    match operation {
        OperationType::Insert | OperationType::Upsert => {
            if validated.columns.is_empty() {
                return Err(ValidationError::NoValidMapping);
            }
        }
        OperationType::Update => {
            if validated.keys().next().is_none() {
                return Err(ValidationError::MissingKeyField);
            }
            if validated.non_keys().next().is_none() {
                return Err(ValidationError::MissingUpdateField);
            }
        }
        OperationType::Delete => {
            if validated.keys().next().is_none() {
                return Err(ValidationError::MissingPrimaryKeys("DELETE"));
            }
        }
    }

    Ok(validated)
}

/// Validate a full mapping-based request
pub fn validate_request(request: &GenerationRequest) -> ValidationResult<ValidatedMappings> {
    if request.table_name.is_empty() {
        return Err(ValidationError::MissingTableName);
    }
    if request.data.is_empty() {
        return Err(ValidationError::EmptyData);
    }
    validate_mappings(&request.mapping, request.operation_type)
}

/// Validate a row-keyed request
pub fn validate_generic(
    data: &[Row],
    operation: GenericOperation,
    options: &GenericOptions,
) -> ValidationResult<()> {
    if data.is_empty() {
        return Err(ValidationError::EmptyData);
    }
    if options.table_name.is_empty() {
        return Err(ValidationError::MissingTableName);
    }
    match operation {
        GenericOperation::Insert => {}
        GenericOperation::Update => {
            if options.primary_keys.is_empty() {
                return Err(ValidationError::MissingPrimaryKeys("UPDATE"));
            }
            // SET columns come from the first row
            if data[0]
                .columns()
                .all(|c| options.primary_keys.iter().any(|k| k == c))
            {
                return Err(ValidationError::MissingUpdateField);
            }
        }
        GenericOperation::Delete if options.primary_keys.is_empty() => {
            return Err(ValidationError::MissingPrimaryKeys("DELETE"));
        }
        _ => {}
    }
    Ok(())
}
