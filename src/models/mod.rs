//! Models module for the SDK
//!
//! Defines the transient request types the generator consumes and the saved
//! record and config types the stores persist.

pub mod mapping;
pub mod request;
pub mod row;
pub mod saved_config;
pub mod table;
pub mod work_record;

pub use mapping::{ColumnMapping, ColumnType, TransformKind};
pub use request::{GenerationRequest, GenericOperation, GenericOptions, OperationType, SqlOutput};
pub use row::{CellValue, Row};
pub use saved_config::{
    DatabaseKind, DbConfig, ExcelConfig, ExcelConfigKind, NewExcelConfig, StoredConfig,
};
pub use table::{ColumnDescriptor, TableDescriptor};
pub use work_record::{NewWorkRecord, WorkRecord};
