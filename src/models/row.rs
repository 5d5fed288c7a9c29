//! Spreadsheet row model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::export::coerce::{DATE_LITERAL_FORMAT, js_number_string};

/// A single spreadsheet row: source column name to cell value
///
/// Key order is preserved, so the first row of a set defines column order
/// for the row-keyed generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Row(serde_json::Map<String, serde_json::Value>);

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from a JSON object. Returns `None` for any other JSON value.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Set a cell, returning the row
    pub fn with(mut self, column: impl Into<String>, value: serde_json::Value) -> Self {
        self.0.insert(column.into(), value);
        self
    }

    /// Raw cell value. `None` means the column is absent from the row.
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.0.get(column)
    }

    /// Cell value as a [`CellValue`], absent columns reading as null
    pub fn cell(&self, column: &str) -> CellValue {
        self.get(column).map(CellValue::from).unwrap_or(CellValue::Null)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Row {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// A loosely-typed cell value as seen by the value formatter
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Produced by the `date` transform
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// `null` and the empty string both format as bare `NULL`
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String form of the value, as spreadsheet tooling renders it
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => "null".to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => js_number_string(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::DateTime(dt) => dt.format(DATE_LITERAL_FORMAT).to_string(),
        }
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(*b),
            serde_json::Value::Number(n) => CellValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}
