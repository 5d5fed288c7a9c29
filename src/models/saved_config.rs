//! Entries of the named config document
//!
//! The document mixes two kinds of entries: database connection configs,
//! tagged with their database `type`, and saved spreadsheets, tagged
//! `"type": "excel"` and keyed `excel_<name>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::row::Row;

/// Key prefix of saved spreadsheet entries
pub const EXCEL_CONFIG_PREFIX: &str = "excel_";

/// Supported database kinds for saved connection configs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    Mysql,
    Postgresql,
    Sqlserver,
}

/// A saved database connection config
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DbConfig {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Type tag of saved spreadsheet entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcelConfigKind {
    #[default]
    Excel,
}

/// A spreadsheet saved with its mapping, without a target table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExcelConfig {
    #[serde(rename = "type")]
    pub kind: ExcelConfigKind,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when saving a spreadsheet config
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExcelConfig {
    pub name: String,
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
}

impl NewExcelConfig {
    /// Key the entry is stored under
    pub fn key(&self) -> String {
        format!("{}{}", EXCEL_CONFIG_PREFIX, self.name)
    }

    pub fn into_config(self, now: DateTime<Utc>) -> ExcelConfig {
        ExcelConfig {
            kind: ExcelConfigKind::Excel,
            excel_data: self.excel_data,
            columns: self.columns,
            original_file_name: self.original_file_name,
            worksheet: self.worksheet,
            mapping: self.mapping,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Any entry of the config document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StoredConfig {
    Database(DbConfig),
    Excel(ExcelConfig),
}

impl StoredConfig {
    pub fn as_database(&self) -> Option<&DbConfig> {
        match self {
            StoredConfig::Database(config) => Some(config),
            StoredConfig::Excel(_) => None,
        }
    }

    pub fn as_excel(&self) -> Option<&ExcelConfig> {
        match self {
            StoredConfig::Excel(config) => Some(config),
            StoredConfig::Database(_) => None,
        }
    }

    /// Entry kind as written in its `type` tag
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoredConfig::Database(config) => match config.kind {
                DatabaseKind::Mysql => "mysql",
                DatabaseKind::Postgresql => "postgresql",
                DatabaseKind::Sqlserver => "sqlserver",
            },
            StoredConfig::Excel(_) => "excel",
        }
    }
}
