//! Generation entry points
//!
//! Validates a request, then hands it to the [`StatementBuilder`].

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::export::batch::{BatchGeneration, merge_work_records};
use crate::export::formatter::{LiteralEmbeddingFormatter, ValueFormatter};
use crate::export::sql::StatementBuilder;
use crate::export::GenerateResult;
use crate::models::{GenerationRequest, GenericOperation, GenericOptions, Row, SqlOutput, WorkRecord};
use crate::validation::{validate_generic, validate_request};

/// Validating SQL generator
#[derive(Debug, Clone, Default)]
pub struct SqlGenerator<F = LiteralEmbeddingFormatter> {
    builder: StatementBuilder<F>,
}

impl SqlGenerator<LiteralEmbeddingFormatter> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            builder: StatementBuilder::new().with_config(config),
        }
    }
}

impl<F: ValueFormatter> SqlGenerator<F> {
    pub fn with_builder(builder: StatementBuilder<F>) -> Self {
        Self { builder }
    }

    pub fn builder(&self) -> &StatementBuilder<F> {
        &self.builder
    }

    /// Generate statements for a mapping-based request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sheet_sql_sdk::export::SqlGenerator;
    /// use sheet_sql_sdk::models::{ColumnMapping, GenerationRequest, OperationType, Row};
    /// use serde_json::json;
    ///
    /// let request = GenerationRequest::new(
    ///     "users",
    ///     OperationType::Delete,
    ///     vec![ColumnMapping::new("id").with_source("ID").with_type("int").with_key(true)],
    ///     vec![Row::new().with("ID", json!("7"))],
    /// );
    ///
    /// let sql = SqlGenerator::new().generate(&request).unwrap();
    /// assert_eq!(sql, "DELETE FROM users WHERE id = 7;");
    /// ```
    pub fn generate(&self, request: &GenerationRequest) -> GenerateResult<String> {
        let validated = validate_request(request)?;
        let sql = self.builder.build(&request.table_name, &validated, &request.data);
        debug!(
            "Generated {} for table {} ({} row(s), {} column(s))",
            request.operation_type,
            request.table_name,
            request.data.len(),
            validated.columns.len()
        );
        Ok(sql)
    }

    /// Generate statements straight from row objects
    pub fn generate_generic(
        &self,
        data: &[Row],
        operation: GenericOperation,
        options: &GenericOptions,
    ) -> GenerateResult<SqlOutput> {
        validate_generic(data, operation, options)?;
        let output = self.builder.generic(data, operation, options);
        debug!(
            "Generated row-keyed {} for table {} ({} row(s), bulk={})",
            operation,
            options.table_name,
            data.len(),
            options.bulk
        );
        Ok(output)
    }

    /// Merge work records and generate statements for the combined rows
    pub fn generate_batch(&self, records: &[WorkRecord]) -> GenerateResult<BatchGeneration> {
        let request = merge_work_records(records)?;
        let sql_statements = self.generate(&request)?;
        Ok(BatchGeneration {
            sql_statements,
            record_count: request.data.len(),
            target_table: request.table_name,
            operation_type: request.operation_type,
        })
    }
}

/// Generate statements for a mapping-based request with default settings
pub fn generate_sql(request: &GenerationRequest) -> GenerateResult<String> {
    SqlGenerator::new().generate(request)
}

/// Generate row-keyed statements with default settings
pub fn generate_sql_generic(
    data: &[Row],
    operation: GenericOperation,
    options: &GenericOptions,
) -> GenerateResult<SqlOutput> {
    SqlGenerator::new().generate_generic(data, operation, options)
}

/// Generate statements for several work records with default settings
pub fn generate_from_work_records(records: &[WorkRecord]) -> GenerateResult<BatchGeneration> {
    SqlGenerator::new().generate_batch(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{GenerateError, MergeError};
    use crate::models::{ColumnMapping, OperationType};
    use crate::validation::ValidationError;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_validation_errors_surface() {
        let request = GenerationRequest::new("users", OperationType::Insert, vec![], vec![Row::new()]);
        let err = generate_sql(&request).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::Validation(ValidationError::NoValidMapping)
        ));
    }

    #[test]
    fn test_generic_validation_runs_first() {
        let err = generate_sql_generic(&[], GenericOperation::Insert, &GenericOptions::new("t"))
            .unwrap_err();
        assert!(matches!(err, GenerateError::Validation(ValidationError::EmptyData)));
    }

    #[test]
    fn test_batch_generation() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let mapping = vec![ColumnMapping::new("id").with_source("ID").with_type("int")];
        let records = vec![
            WorkRecord::new("a", vec![Row::new().with("ID", json!(1))], now)
                .with_target("items", mapping, OperationType::Insert),
            WorkRecord::new("b", vec![Row::new().with("ID", json!(2))], now),
        ];

        let batch = generate_from_work_records(&records).unwrap();
        assert_eq!(batch.sql_statements, "INSERT INTO items (id)\nVALUES (1),\n       (2);");
        assert_eq!(batch.record_count, 2);
        assert_eq!(batch.target_table, "items");

        let wire = serde_json::to_value(&batch).unwrap();
        assert_eq!(wire["operationType"], json!("insert"));
        assert_eq!(wire["recordCount"], json!(2));
    }

    #[test]
    fn test_batch_merge_errors_surface() {
        let err = generate_from_work_records(&[]).unwrap_err();
        assert!(matches!(err, GenerateError::Merge(MergeError::NoRecordsFound)));
    }
}
