//! Sheet SQL SDK - turn spreadsheet rows into SQL statements
//!
//! Provides:
//! - Mapping-based INSERT / UPDATE / UPSERT / DELETE generation
//! - Row-keyed generation with no mapping
//! - Request validation
//! - Saved work records, connection and spreadsheet configs, and session state
//!   (via storage backends)
//!
//! # Example
//!
//! ```rust
//! use sheet_sql_sdk::{ColumnMapping, GenerationRequest, OperationType, Row, generate_sql};
//! use serde_json::json;
//!
//! let request = GenerationRequest::new(
//!     "users",
//!     OperationType::Update,
//!     vec![
//!         ColumnMapping::new("id").with_source("ID").with_type("int").with_key(true),
//!         ColumnMapping::new("email").with_source("Email").with_transform("lower"),
//!     ],
//!     vec![Row::new().with("ID", json!(3)).with("Email", json!("ANN@EXAMPLE.COM"))],
//! );
//!
//! let sql = generate_sql(&request).unwrap();
//! assert_eq!(sql, "UPDATE users SET email = 'ann@example.com' WHERE id = 3;");
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod models;
pub mod storage;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError, GeneratorConfig, SqlDialect};
pub use export::{
    BatchGeneration, GenerateError, GenerateResult, LiteralEmbeddingFormatter, MergeError,
    MergedConfigs, SqlGenerator, StatementBuilder, ValueFormatter, generate_from_work_records,
    generate_sql, generate_sql_generic, merge_excel_configs, merge_work_records,
};
pub use models::{
    CellValue, ColumnDescriptor, ColumnMapping, ColumnType, DatabaseKind, DbConfig, ExcelConfig,
    GenerationRequest, GenericOperation, GenericOptions, NewExcelConfig, NewWorkRecord,
    OperationType, Row, SqlOutput, StoredConfig, TableDescriptor, TransformKind, WorkRecord,
};
pub use storage::{InMemoryStorageBackend, StorageBackend, StorageError};
#[cfg(feature = "native-fs")]
pub use storage::FileSystemStorageBackend;
pub use store::{ConfigStore, SessionState, SessionStore, StoreError, WorkRecordStore};
pub use validation::{ValidationError, validate_generic, validate_mappings, validate_request};
