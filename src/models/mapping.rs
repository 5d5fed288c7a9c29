//! Column mapping model
//!
//! A mapping ties a target database column to a source spreadsheet column,
//! an optional default, a free-form type string and an optional transform.

use serde::{Deserialize, Deserializer, Serialize};

/// Mapping from a source spreadsheet column to a target database column
///
/// Field names follow the camelCase wire format used by saved work records.
///
/// # Example
///
/// ```rust
/// use sheet_sql_sdk::models::ColumnMapping;
///
/// let mapping = ColumnMapping::new("id")
///     .with_source("ID")
///     .with_type("int")
///     .with_key(true);
/// assert!(mapping.is_usable());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMapping {
    /// Target column name
    pub db_column: String,
    /// Source column (spreadsheet header)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_column: Option<String>,
    /// Value used when the row has no entry for the source column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    /// Target column type as reported by the database (e.g. "varchar", "bigint")
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    /// Whether the column identifies the row in UPDATE/DELETE statements
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_key: bool,
    /// Transform name applied before type coercion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}

/// An explicit `null` flag reads as unset
fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl ColumnMapping {
    /// Create a mapping for the given target column with no data source
    pub fn new(db_column: impl Into<String>) -> Self {
        Self {
            db_column: db_column.into(),
            ..Default::default()
        }
    }

    /// Set the source column
    pub fn with_source(mut self, excel_column: impl Into<String>) -> Self {
        self.excel_column = Some(excel_column.into());
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: serde_json::Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Set the target column type
    pub fn with_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }

    /// Mark or unmark the mapping as a key column
    pub fn with_key(mut self, is_key: bool) -> Self {
        self.is_key = is_key;
        self
    }

    /// Set the transform name
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Source column, if one is set and non-empty
    pub fn source_column(&self) -> Option<&str> {
        self.excel_column.as_deref().filter(|c| !c.is_empty())
    }

    /// Default value, if one is set and truthy
    ///
    /// `null`, `false`, `0` and `""` do not count as defaults.
    pub fn effective_default(&self) -> Option<&serde_json::Value> {
        self.default_value.as_ref().filter(|v| is_truthy(v))
    }

    /// A mapping is usable when it has a source column or a default value
    pub fn is_usable(&self) -> bool {
        self.source_column().is_some() || self.effective_default().is_some()
    }
}

/// Truthiness of a loosely-typed spreadsheet value
pub(crate) fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Value rewrite applied before type coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Upper-case the string form
    Upper,
    /// Lower-case the string form
    Lower,
    /// Strip surrounding whitespace
    Trim,
    /// Parse as a date, keeping the original value when unparsable
    Date,
    /// Parse as a number, keeping the original value when unparsable
    Number,
}

impl TransformKind {
    /// Resolve a transform name. Unknown names resolve to `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "upper" => Some(TransformKind::Upper),
            "lower" => Some(TransformKind::Lower),
            "trim" => Some(TransformKind::Trim),
            "date" => Some(TransformKind::Date),
            "number" => Some(TransformKind::Number),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformKind::Upper => write!(f, "upper"),
            TransformKind::Lower => write!(f, "lower"),
            TransformKind::Trim => write!(f, "trim"),
            TransformKind::Date => write!(f, "date"),
            TransformKind::Number => write!(f, "number"),
        }
    }
}

/// Coercion class of a target column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Whole numbers
    Integer,
    /// Fractional numbers
    Decimal,
    /// Dates and timestamps
    DateTime,
    /// Everything else, emitted as a quoted string
    #[default]
    Text,
}

impl ColumnType {
    /// Classify a database type name.
    ///
    /// Matching is by case-insensitive substring in precedence order:
    /// `int`, then `decimal`/`float`, then `date`.
    pub fn classify(type_name: Option<&str>) -> Self {
        let Some(type_name) = type_name else {
            return ColumnType::Text;
        };
        let lower = type_name.to_lowercase();
        if lower.contains("int") {
            ColumnType::Integer
        } else if lower.contains("decimal") || lower.contains("float") {
            ColumnType::Decimal
        } else if lower.contains("date") {
            ColumnType::DateTime
        } else {
            ColumnType::Text
        }
    }
}
