//! Generic (row-keyed) command implementation

use crate::cli::commands::load_input;
use crate::cli::error::CliError;
use crate::cli::output::format_sql_output;
use crate::config::GeneratorConfig;
use crate::export::SqlGenerator;
use crate::models::{GenericOperation, GenericOptions, Row};

/// Parse a JSON array of row objects
pub fn parse_rows(content: &str) -> Result<Vec<Row>, CliError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(items) = value else {
        return Err(CliError::InvalidArgument(
            "data must be a JSON array of row objects".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            Row::from_json(item).ok_or_else(|| {
                CliError::InvalidArgument(format!("row {} is not a JSON object", idx + 1))
            })
        })
        .collect()
}

/// Generate row-keyed statements from JSON row content
pub fn generic_from_str(
    content: &str,
    operation: &str,
    options: &GenericOptions,
    config: &GeneratorConfig,
) -> Result<String, CliError> {
    let operation: GenericOperation = operation
        .parse()
        .map_err(|e: crate::validation::ValidationError| CliError::InvalidArgument(e.to_string()))?;
    let rows = parse_rows(content)?;
    let output = SqlGenerator::with_config(config.clone()).generate_generic(&rows, operation, options)?;
    Ok(format_sql_output(output))
}

/// Handle the generic command
pub fn handle_generic(
    input: &str,
    operation: &str,
    options: &GenericOptions,
    config: &GeneratorConfig,
) -> Result<String, CliError> {
    let content = load_input(input)?;
    generic_from_str(&content, operation, options, config)
}
