//! Generation request types

use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use super::row::Row;
use crate::validation::ValidationError;

/// Statement kind for the mapping-based generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperationType {
    #[default]
    Insert,
    Update,
    /// MySQL `INSERT ... ON DUPLICATE KEY UPDATE`
    Upsert,
    Delete,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::Update => "update",
            OperationType::Upsert => "upsert",
            OperationType::Delete => "delete",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "insert" => Ok(OperationType::Insert),
            "update" => Ok(OperationType::Update),
            "upsert" => Ok(OperationType::Upsert),
            "delete" => Ok(OperationType::Delete),
            other => Err(ValidationError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl TryFrom<String> for OperationType {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OperationType> for String {
    fn from(op: OperationType) -> Self {
        op.as_str().to_string()
    }
}

/// Request for the mapping-based generator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub table_name: String,
    pub operation_type: OperationType,
    #[serde(default)]
    pub mapping: Vec<ColumnMapping>,
    #[serde(default)]
    pub data: Vec<Row>,
}

impl GenerationRequest {
    pub fn new(
        table_name: impl Into<String>,
        operation_type: OperationType,
        mapping: Vec<ColumnMapping>,
        data: Vec<Row>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            operation_type,
            mapping,
            data,
        }
    }
}

/// Statement kind for the row-keyed generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GenericOperation {
    Insert,
    Update,
    Delete,
}

impl std::str::FromStr for GenericOperation {
    type Err = ValidationError;

    /// Only the exact literals `INSERT`, `UPDATE` and `DELETE` are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(GenericOperation::Insert),
            "UPDATE" => Ok(GenericOperation::Update),
            "DELETE" => Ok(GenericOperation::Delete),
            other => Err(ValidationError::UnsupportedOperation(other.to_string())),
        }
    }
}

impl std::fmt::Display for GenericOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenericOperation::Insert => write!(f, "INSERT"),
            GenericOperation::Update => write!(f, "UPDATE"),
            GenericOperation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Options for the row-keyed generator
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenericOptions {
    pub table_name: String,
    /// Columns identifying a row for UPDATE and DELETE
    #[serde(default)]
    pub primary_keys: Vec<String>,
    /// Emit one statement per row instead of a single statement
    #[serde(default)]
    pub bulk: bool,
}

impl GenericOptions {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Default::default()
        }
    }

    pub fn with_primary_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bulk(mut self, bulk: bool) -> Self {
        self.bulk = bulk;
        self
    }
}

/// Output of the row-keyed generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlOutput {
    /// Single statement text (`bulk = false`)
    Text(String),
    /// One statement per row (`bulk = true`)
    Statements(Vec<String>),
}

impl SqlOutput {
    /// Flatten into statement text, one statement per line
    pub fn into_text(self) -> String {
        match self {
            SqlOutput::Text(text) => text,
            SqlOutput::Statements(statements) => statements.join("\n"),
        }
    }
}
