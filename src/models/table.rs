//! Target table descriptor
//!
//! Describes a table as reported by database introspection. The generator never
//! talks to a database itself; callers supply these descriptors.

use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;

/// A column of a target table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Database type name (e.g. "varchar", "int", "datetime")
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub comment: String,
}

fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            nullable: true,
            primary: false,
            comment: String::new(),
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }
}

/// A target table: name plus ordered columns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableDescriptor {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Names of the primary key columns, in column order
    pub fn primary_keys(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.primary)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Seed a mapping list from this table and a set of spreadsheet headers.
    ///
    /// Every table column yields one mapping, in column order. A header is
    /// matched when it equals the column name ignoring case, spaces, `_` and
    /// `-`. Primary columns become keys and the column type is copied over.
    /// Columns with no matching header get a mapping with no source, which
    /// the generator drops.
    pub fn suggest_mappings<S: AsRef<str>>(&self, headers: &[S]) -> Vec<ColumnMapping> {
        self.columns
            .iter()
            .map(|column| {
                let wanted = normalize(&column.name);
                let source = headers
                    .iter()
                    .map(AsRef::as_ref)
                    .find(|h| *h == column.name)
                    .or_else(|| {
                        headers
                            .iter()
                            .map(AsRef::as_ref)
                            .find(|h| normalize(h) == wanted)
                    });

                let mut mapping = ColumnMapping::new(column.name.clone())
                    .with_type(column.data_type.clone())
                    .with_key(column.primary);
                if let Some(source) = source {
                    mapping = mapping.with_source(source);
                }
                mapping
            })
            .collect()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}
