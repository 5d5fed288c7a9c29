//! Work record commands

use serde::Serialize;

use crate::cli::commands::load_input;
use crate::cli::error::CliError;
use crate::cli::output::{format_batch, format_record_list};
use crate::export::SqlGenerator;
use crate::models::{NewWorkRecord, StoredConfig, WorkRecord};
use crate::storage::StorageBackend;
use crate::store::{ConfigStore, StoreError, WorkRecordStore};

/// A record with its saved config resolved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: WorkRecord,
    pub db_config: Option<StoredConfig>,
}

/// Save a record from a JSON document
pub async fn save<B: StorageBackend>(
    store: &WorkRecordStore<B>,
    input: &str,
) -> Result<String, CliError> {
    let content = load_input(input)?;
    let new_record: NewWorkRecord = serde_json::from_str(&content)?;
    let record = store.save(new_record).await?;
    Ok(format!("Saved {} ({} row(s))", record.id, record.record_count))
}

pub async fn list<B: StorageBackend>(store: &WorkRecordStore<B>) -> Result<String, CliError> {
    Ok(format_record_list(&store.list().await?))
}

/// Pretty JSON of a record, with its config when one is saved
pub async fn show<B: StorageBackend, C: StorageBackend>(
    store: &WorkRecordStore<B>,
    configs: &ConfigStore<C>,
    id: &str,
) -> Result<String, CliError> {
    let record = store.get(id).await?;
    let db_config = match record.db_config_name.as_deref() {
        Some(name) => match configs.get(name).await {
            Ok(config) => Some(config),
            Err(StoreError::ConfigNotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        None => None,
    };
    Ok(serde_json::to_string_pretty(&RecordDetail { record, db_config })?)
}

pub async fn delete<B: StorageBackend>(
    store: &WorkRecordStore<B>,
    id: &str,
) -> Result<String, CliError> {
    store.delete(id).await?;
    Ok(format!("Deleted {}", id))
}

/// Generate statements for several records, as text or as the JSON result
pub async fn generate<B: StorageBackend>(
    store: &WorkRecordStore<B>,
    generator: &SqlGenerator,
    ids: &[String],
    json: bool,
) -> Result<String, CliError> {
    let batch = store.generate(ids, generator).await?;
    if json {
        Ok(serde_json::to_string_pretty(&batch)?)
    } else {
        Ok(format_batch(&batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnMapping, DatabaseKind, DbConfig, NewExcelConfig, Row};
    use crate::storage::InMemoryStorageBackend;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_show_resolves_config() {
        let backend = Arc::new(InMemoryStorageBackend::new());
        let store = WorkRecordStore::new(backend.clone());
        let configs = ConfigStore::new(backend.clone());

        configs
            .save(
                "local",
                &DbConfig {
                    kind: DatabaseKind::Mysql,
                    host: "localhost".to_string(),
                    port: 3306,
                    database: "shop".to_string(),
                    username: "root".to_string(),
                    password: String::new(),
                },
            )
            .await
            .unwrap();

        let record = store
            .save(NewWorkRecord {
                name: "q1".to_string(),
                excel_data: vec![Row::new().with("ID", json!(1))],
                db_config_name: Some("local".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let text = show(&store, &configs, &record.id).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["id"], json!(record.id));
        assert_eq!(value["dbConfig"]["host"], json!("localhost"));
    }

    #[tokio::test]
    async fn test_show_resolves_spreadsheet_config() {
        let backend = Arc::new(InMemoryStorageBackend::new());
        let store = WorkRecordStore::new(backend.clone());
        let configs = ConfigStore::new(backend.clone());

        let key = configs
            .save_excel(NewExcelConfig {
                name: "orders".to_string(),
                excel_data: vec![Row::new().with("SKU", json!("A-1"))],
                worksheet: Some("Sheet1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let record = store
            .save(NewWorkRecord {
                name: "q2".to_string(),
                db_config_name: Some(key),
                ..Default::default()
            })
            .await
            .unwrap();

        let text = show(&store, &configs, &record.id).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["dbConfig"]["type"], json!("excel"));
        assert_eq!(value["dbConfig"]["worksheet"], json!("Sheet1"));
    }

    #[tokio::test]
    async fn test_generate_text_and_json() {
        let store = WorkRecordStore::new(InMemoryStorageBackend::new());
        let record = store
            .save(NewWorkRecord {
                name: "q1".to_string(),
                excel_data: vec![Row::new().with("ID", json!(5))],
                target_table: Some("t".to_string()),
                mapping: Some(vec![
                    ColumnMapping::new("id").with_source("ID").with_type("int").with_key(true),
                ]),
                operation_type: Some(crate::models::OperationType::Delete),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids = vec![record.id.clone()];
        let generator = SqlGenerator::new();

        let text = generate(&store, &generator, &ids, false).await.unwrap();
        assert_eq!(text, "-- delete 1 row(s) into t\nDELETE FROM t WHERE id = 5;");

        let wire = generate(&store, &generator, &ids, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["sqlStatements"], json!("DELETE FROM t WHERE id = 5;"));
    }
}
