//! Configuration types for statement generation and the CLI

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Identifier quoting style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    /// Backticks
    Mysql,
    /// Double quotes
    #[serde(alias = "postgresql")]
    Postgres,
    /// Brackets
    #[serde(alias = "mssql")]
    Sqlserver,
}

impl SqlDialect {
    /// Quote and escape a single identifier.
    ///
    /// The closing quote character is escaped by doubling it.
    pub fn quote(&self, identifier: &str) -> String {
        match self {
            SqlDialect::Mysql => format!("`{}`", identifier.replace('`', "``")),
            SqlDialect::Postgres => format!("\"{}\"", identifier.replace('"', "\"\"")),
            SqlDialect::Sqlserver => format!("[{}]", identifier.replace(']', "]]")),
        }
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(SqlDialect::Mysql),
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "sqlserver" | "mssql" => Ok(SqlDialect::Sqlserver),
            _ => Err(format!(
                "Invalid SQL dialect: {}. Expected: mysql, postgres, sqlserver",
                s
            )),
        }
    }
}

/// Options for statement generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Quote table and column identifiers in this dialect's style.
    /// `None` emits identifiers exactly as given.
    pub quote_identifiers: Option<SqlDialect>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quoting(mut self, dialect: SqlDialect) -> Self {
        self.quote_identifiers = Some(dialect);
        self
    }

    /// Render a column name
    pub fn column(&self, name: &str) -> String {
        match self.quote_identifiers {
            Some(dialect) => dialect.quote(name),
            None => name.to_string(),
        }
    }

    /// Render a table name, quoting each `.`-separated part
    pub fn table(&self, name: &str) -> String {
        match self.quote_identifiers {
            Some(dialect) => name
                .split('.')
                .map(|part| dialect.quote(part))
                .collect::<Vec<_>>()
                .join("."),
            None => name.to_string(),
        }
    }
}

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Top-level configuration file
///
/// ```toml
/// data_dir = "data"
///
/// [generator]
/// quote_identifiers = "mysql"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding work records, saved configs and session state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_quoting_escapes() {
        assert_eq!(SqlDialect::Mysql.quote("a`b"), "`a``b`");
        assert_eq!(SqlDialect::Postgres.quote("a\"b"), "\"a\"\"b\"");
        assert_eq!(SqlDialect::Sqlserver.quote("a]b"), "[a]]b]");
    }

    #[test]
    fn test_unquoted_by_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.table("app.users"), "app.users");
        assert_eq!(config.column("user name"), "user name");
    }

    #[test]
    fn test_table_parts_quoted_separately() {
        let config = GeneratorConfig::new().with_quoting(SqlDialect::Postgres);
        assert_eq!(config.table("app.users"), "\"app\".\"users\"");
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("MSSQL".parse::<SqlDialect>().unwrap(), SqlDialect::Sqlserver);
        assert_eq!("postgresql".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert!("oracle".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_app_config_from_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            data_dir = "/var/lib/sheet-sql"

            [generator]
            quote_identifiers = "postgresql"
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/sheet-sql"));
        assert_eq!(config.generator.quote_identifiers, Some(SqlDialect::Postgres));

        let empty = AppConfig::from_toml_str("").unwrap();
        assert_eq!(empty, AppConfig::default());
    }

    #[test]
    fn test_app_config_rejects_bad_dialect() {
        let err = AppConfig::from_toml_str("[generator]\nquote_identifiers = \"oracle\"\n");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }
}
