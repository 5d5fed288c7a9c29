//! SQL statement assembly
//!
//! Builds INSERT, UPDATE, UPSERT and DELETE text from validated mappings and
//! rows. Validation happens before this point; the builder assumes every
//! operation's mapping requirements already hold.
//!
//! # Security
//!
//! Values are embedded as literals with single quotes doubled. Identifiers
//! are emitted as given unless [`GeneratorConfig::quote_identifiers`] selects
//! a dialect, in which case they are quoted and escaped by doubling the
//! dialect's closing quote character.

use crate::config::GeneratorConfig;
use crate::export::formatter::{LiteralEmbeddingFormatter, ValueFormatter};
use crate::models::{OperationType, Row};
use crate::validation::{ResolvedMapping, ValidatedMappings};

/// Separator between the `VALUES` tuples of a multi-row insert
const VALUES_SEPARATOR: &str = ",\n       ";

/// Separator between per-row statements
pub(crate) const STATEMENT_SEPARATOR: &str = "\n\n";

/// Assembles statement text, delegating value rendering to a [`ValueFormatter`]
#[derive(Debug, Clone, Default)]
pub struct StatementBuilder<F = LiteralEmbeddingFormatter> {
    formatter: F,
    config: GeneratorConfig,
}

impl StatementBuilder<LiteralEmbeddingFormatter> {
    /// Builder with literal embedding and unquoted identifiers
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: ValueFormatter> StatementBuilder<F> {
    pub fn with_formatter(formatter: F, config: GeneratorConfig) -> Self {
        Self { formatter, config }
    }

    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Build statement text for the operation carried by `mappings`
    pub fn build(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        match mappings.operation {
            OperationType::Insert => self.insert(table, mappings, rows),
            OperationType::Update => self.update(table, mappings, rows),
            OperationType::Upsert => self.upsert(table, mappings, rows),
            OperationType::Delete => self.delete(table, mappings, rows),
        }
    }

    /// One multi-row INSERT.
    ///
    /// ```rust
    /// use sheet_sql_sdk::export::StatementBuilder;
    /// use sheet_sql_sdk::models::{ColumnMapping, OperationType, Row};
    /// use sheet_sql_sdk::validation::validate_mappings;
    /// use serde_json::json;
    ///
    /// let mapping = vec![ColumnMapping::new("name").with_source("Name")];
    /// let validated = validate_mappings(&mapping, OperationType::Insert).unwrap();
    /// let rows = vec![
    ///     Row::new().with("Name", json!("Ann")),
    ///     Row::new().with("Name", json!("Bob")),
    /// ];
    ///
    /// let sql = StatementBuilder::new().insert("users", &validated, &rows);
    /// assert_eq!(sql, "INSERT INTO users (name)\nVALUES ('Ann'),\n       ('Bob');");
    /// ```
    pub fn insert(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        format!("{};", self.insert_body(table, mappings, rows))
    }

    /// One UPDATE per row: non-key columns in SET, key columns in WHERE
    pub fn update(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        let table = self.config.table(table);
        let set_columns: Vec<&ResolvedMapping> = mappings.non_keys().collect();
        let key_columns: Vec<&ResolvedMapping> = mappings.keys().collect();

        rows.iter()
            .map(|row| {
                format!(
                    "UPDATE {} SET {} WHERE {};",
                    table,
                    self.assignments(&set_columns, row, ", "),
                    self.assignments(&key_columns, row, " AND ")
                )
            })
            .collect::<Vec<_>>()
            .join(STATEMENT_SEPARATOR)
    }

    /// INSERT with `ON DUPLICATE KEY UPDATE` over the non-key columns.
    ///
    /// The clause is omitted when every usable mapping is a key.
    pub fn upsert(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        let mut sql = self.insert_body(table, mappings, rows);

        let updates: Vec<String> = mappings
            .non_keys()
            .map(|m| {
                let column = self.config.column(&m.db_column);
                format!("{} = VALUES({})", column, column)
            })
            .collect();

        if !updates.is_empty() {
            sql.push_str("\nON DUPLICATE KEY UPDATE ");
            sql.push_str(&updates.join(", "));
        }
        sql.push(';');
        sql
    }

    /// One DELETE per row, matched on key columns
    pub fn delete(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        let table = self.config.table(table);
        let key_columns: Vec<&ResolvedMapping> = mappings.keys().collect();

        rows.iter()
            .map(|row| {
                format!(
                    "DELETE FROM {} WHERE {};",
                    table,
                    self.assignments(&key_columns, row, " AND ")
                )
            })
            .collect::<Vec<_>>()
            .join(STATEMENT_SEPARATOR)
    }

    /// `INSERT INTO t (cols)\nVALUES (...)` without the terminator
    fn insert_body(&self, table: &str, mappings: &ValidatedMappings, rows: &[Row]) -> String {
        let columns: Vec<String> = mappings
            .columns
            .iter()
            .map(|m| self.config.column(&m.db_column))
            .collect();

        let tuples: Vec<String> = rows
            .iter()
            .map(|row| {
                let values: Vec<String> = mappings
                    .columns
                    .iter()
                    .map(|m| self.formatter.format(&m.value_for(row), m))
                    .collect();
                format!("({})", values.join(", "))
            })
            .collect();

        format!(
            "INSERT INTO {} ({})\nVALUES {}",
            self.config.table(table),
            columns.join(", "),
            tuples.join(VALUES_SEPARATOR)
        )
    }

    /// `col = value` pairs for one row, joined by `separator`
    fn assignments(&self, columns: &[&ResolvedMapping], row: &Row, separator: &str) -> String {
        columns
            .iter()
            .map(|m| {
                format!(
                    "{} = {}",
                    self.config.column(&m.db_column),
                    self.formatter.format(&m.value_for(row), m)
                )
            })
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SqlDialect;
    use crate::models::{CellValue, ColumnMapping};
    use crate::validation::validate_mappings;
    use serde_json::json;

    fn user_mappings() -> Vec<ColumnMapping> {
        vec![
            ColumnMapping::new("id").with_source("ID").with_type("int").with_key(true),
            ColumnMapping::new("name").with_source("Name"),
        ]
    }

    fn user_rows() -> Vec<Row> {
        vec![
            Row::new().with("ID", json!("1")).with("Name", json!("Ann")),
            Row::new().with("ID", json!("2")).with("Name", json!("O'Brien")),
        ]
    }

    fn build(op: OperationType, mappings: &[ColumnMapping], rows: &[Row]) -> String {
        let validated = validate_mappings(mappings, op).unwrap();
        StatementBuilder::new().build("users", &validated, rows)
    }

    #[test]
    fn test_insert_layout() {
        let sql = build(OperationType::Insert, &user_mappings(), &user_rows());
        assert_eq!(
            sql,
            "INSERT INTO users (id, name)\nVALUES (1, 'Ann'),\n       (2, 'O''Brien');"
        );
    }

    #[test]
    fn test_update_per_row() {
        let sql = build(OperationType::Update, &user_mappings(), &user_rows());
        assert_eq!(
            sql,
            "UPDATE users SET name = 'Ann' WHERE id = 1;\n\n\
             UPDATE users SET name = 'O''Brien' WHERE id = 2;"
        );
    }

    #[test]
    fn test_update_multiple_keys_joined_with_and() {
        let mappings = vec![
            ColumnMapping::new("tenant").with_source("T").with_key(true),
            ColumnMapping::new("id").with_source("ID").with_type("int").with_key(true),
            ColumnMapping::new("total").with_source("Total").with_type("decimal"),
            ColumnMapping::new("note").with_source("Note"),
        ];
        let rows = vec![
            Row::new()
                .with("T", json!("acme"))
                .with("ID", json!(7))
                .with("Total", json!("12.50"))
                .with("Note", json!(null)),
        ];
        let sql = build(OperationType::Update, &mappings, &rows);
        assert_eq!(
            sql,
            "UPDATE users SET total = 12.5, note = NULL WHERE tenant = 'acme' AND id = 7;"
        );
    }

    #[test]
    fn test_upsert_clause() {
        let sql = build(OperationType::Upsert, &user_mappings(), &user_rows()[..1]);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name)\nVALUES (1, 'Ann')\n\
             ON DUPLICATE KEY UPDATE name = VALUES(name);"
        );
    }

    #[test]
    fn test_upsert_without_non_keys_omits_clause() {
        let mappings = vec![ColumnMapping::new("id").with_source("ID").with_key(true)];
        let sql = build(OperationType::Upsert, &mappings, &user_rows()[..1]);
        assert_eq!(sql, "INSERT INTO users (id)\nVALUES ('1');");
    }

    #[test]
    fn test_delete_per_row() {
        let sql = build(OperationType::Delete, &user_mappings(), &user_rows());
        assert_eq!(
            sql,
            "DELETE FROM users WHERE id = 1;\n\nDELETE FROM users WHERE id = 2;"
        );
    }

    #[test]
    fn test_default_fills_missing_cells() {
        let mappings = vec![
            ColumnMapping::new("name").with_source("Name"),
            ColumnMapping::new("status").with_default(json!("active")),
            ColumnMapping::new("source").with_source("Src").with_default(json!("import")),
        ];
        let rows = vec![
            Row::new().with("Name", json!("Ann")),
            Row::new().with("Name", json!("Bob")).with("Src", json!(null)),
        ];
        let sql = build(OperationType::Insert, &mappings, &rows);
        assert_eq!(
            sql,
            "INSERT INTO users (name, status, source)\n\
             VALUES ('Ann', 'active', 'import'),\n       ('Bob', 'active', NULL);"
        );
    }

    #[test]
    fn test_quoted_identifiers() {
        let validated = validate_mappings(&user_mappings(), OperationType::Upsert).unwrap();
        let builder = StatementBuilder::new()
            .with_config(GeneratorConfig::new().with_quoting(SqlDialect::Mysql));
        let sql = builder.build("app.users", &validated, &user_rows()[..1]);
        assert_eq!(
            sql,
            "INSERT INTO `app`.`users` (`id`, `name`)\nVALUES (1, 'Ann')\n\
             ON DUPLICATE KEY UPDATE `name` = VALUES(`name`);"
        );
    }

    struct Placeholder;

    impl ValueFormatter for Placeholder {
        fn format(&self, _value: &CellValue, _mapping: &ResolvedMapping) -> String {
            "?".to_string()
        }

        fn format_untyped(&self, _value: &CellValue) -> String {
            "?".to_string()
        }
    }

    #[test]
    fn test_formatter_is_pluggable() {
        let validated = validate_mappings(&user_mappings(), OperationType::Delete).unwrap();
        let builder = StatementBuilder::with_formatter(Placeholder, GeneratorConfig::default());
        assert_eq!(
            builder.build("users", &validated, &user_rows()[..1]),
            "DELETE FROM users WHERE id = ?;"
        );
    }
}
