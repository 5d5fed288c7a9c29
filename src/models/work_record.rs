//! Saved work records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::request::OperationType;
use super::row::Row;

/// Status assigned to freshly saved work records
pub const STATUS_UPLOADED: &str = "uploaded";

/// An uploaded spreadsheet together with its mapping and target table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub excel_data: Vec<Row>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worksheet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<Vec<ColumnMapping>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<OperationType>,
    /// Name of the associated connection config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_config_name: Option<String>,
    #[serde(default)]
    pub record_count: usize,
    #[serde(default)]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkRecord {
    /// Create a record with an id derived from the name and creation time
    pub fn new(name: impl Into<String>, excel_data: Vec<Row>, now: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            id: format!("work_{}_{}", name, now.timestamp_millis()),
            record_count: excel_data.len(),
            name,
            description: String::new(),
            excel_data,
            columns: Vec::new(),
            original_file_name: None,
            worksheet: None,
            mapping: None,
            target_table: None,
            operation_type: Some(OperationType::Insert),
            db_config_name: None,
            status: STATUS_UPLOADED.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_target(
        mut self,
        table: impl Into<String>,
        mapping: Vec<ColumnMapping>,
        operation: OperationType,
    ) -> Self {
        self.target_table = Some(table.into());
        self.mapping = Some(mapping);
        self.operation_type = Some(operation);
        self
    }

    /// Target table, if set and non-empty
    pub fn target_table(&self) -> Option<&str> {
        self.target_table.as_deref().filter(|t| !t.is_empty())
    }
}

/// Fields supplied when saving a new work record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub excel_data: Vec<Row>,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub original_file_name: Option<String>,
    #[serde(default)]
    pub worksheet: Option<String>,
    #[serde(default)]
    pub mapping: Option<Vec<ColumnMapping>>,
    #[serde(default)]
    pub target_table: Option<String>,
    #[serde(default)]
    pub operation_type: Option<OperationType>,
    #[serde(default)]
    pub db_config_name: Option<String>,
}

impl NewWorkRecord {
    /// Stamp the record with its id, status and timestamps
    pub fn into_record(self, now: DateTime<Utc>) -> WorkRecord {
        let mut record = WorkRecord::new(self.name, self.excel_data, now);
        record.description = self.description.unwrap_or_default();
        record.columns = self.columns;
        record.original_file_name = self.original_file_name;
        record.worksheet = self.worksheet;
        record.mapping = self.mapping;
        record.target_table = self.target_table;
        record.operation_type = Some(self.operation_type.unwrap_or_default());
        record.db_config_name = self.db_config_name;
        record
    }
}
