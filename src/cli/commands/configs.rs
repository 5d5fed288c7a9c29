//! Saved config commands

use crate::cli::commands::load_input;
use crate::cli::error::CliError;
use crate::cli::output::format_config_list;
use crate::export::SqlGenerator;
use crate::models::{NewExcelConfig, OperationType};
use crate::storage::StorageBackend;
use crate::store::ConfigStore;

/// Save a spreadsheet config from a JSON document
pub async fn save_excel<B: StorageBackend>(
    store: &ConfigStore<B>,
    input: &str,
) -> Result<String, CliError> {
    let content = load_input(input)?;
    let new_config: NewExcelConfig = serde_json::from_str(&content)?;
    let rows = new_config.excel_data.len();
    let key = store.save_excel(new_config).await?;
    Ok(format!("Saved {} ({} row(s))", key, rows))
}

pub async fn list<B: StorageBackend>(store: &ConfigStore<B>) -> Result<String, CliError> {
    Ok(format_config_list(&store.list().await?))
}

/// Merge spreadsheet configs.
///
/// With a target table the merged rows are turned into statements,
/// otherwise the merged rows and mapping are printed as JSON.
pub async fn merge<B: StorageBackend>(
    store: &ConfigStore<B>,
    generator: &SqlGenerator,
    keys: &[String],
    target: Option<(&str, OperationType)>,
) -> Result<String, CliError> {
    let merged = store.merge(keys).await?;
    match target {
        Some((table, operation)) => Ok(generator.generate(&merged.into_request(table, operation))?),
        None => Ok(serde_json::to_string_pretty(&merged)?),
    }
}
