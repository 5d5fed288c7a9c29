//! Output formatting for CLI

use crate::export::BatchGeneration;
use crate::models::{SqlOutput, StoredConfig, WorkRecord};

/// Row-keyed output as printable text, one statement per line when bulk
pub fn format_sql_output(output: SqlOutput) -> String {
    output.into_text()
}

/// One line per record: id, name, rows, target and creation time
pub fn format_record_list(records: &[WorkRecord]) -> String {
    if records.is_empty() {
        return "No work records saved".to_string();
    }

    records
        .iter()
        .map(|r| {
            let target = match r.target_table() {
                Some(table) => format!(
                    "{} {}",
                    r.operation_type.unwrap_or_default(),
                    table
                ),
                None => "(no target)".to_string(),
            };
            format!(
                "{}  {}  {} row(s)  {}  {}",
                r.id,
                r.name,
                r.record_count,
                target,
                r.created_at.format("%Y-%m-%d %H:%M:%S")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line per config: name, kind and a short description
pub fn format_config_list(configs: &[(String, StoredConfig)]) -> String {
    if configs.is_empty() {
        return "No configs saved".to_string();
    }

    configs
        .iter()
        .map(|(name, config)| {
            let detail = match config {
                StoredConfig::Database(db) => {
                    format!("{}@{}:{}/{}", db.username, db.host, db.port, db.database)
                }
                StoredConfig::Excel(sheet) => format!(
                    "{} row(s)  {}",
                    sheet.excel_data.len(),
                    sheet.original_file_name.as_deref().unwrap_or("-")
                ),
            };
            format!("{}  {}  {}", name, config.kind_name(), detail)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summary header followed by the statements
pub fn format_batch(batch: &BatchGeneration) -> String {
    format!(
        "-- {} {} row(s) into {}\n{}",
        batch.operation_type, batch.record_count, batch.target_table, batch.sql_statements
    )
}
