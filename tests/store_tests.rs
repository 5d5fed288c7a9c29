//! Store tests against the file system backend

#![cfg(feature = "native-fs")]

use serde_json::json;
use sheet_sql_sdk::store::configs::CONFIGS_FILE;
use sheet_sql_sdk::store::work_records::WORK_RECORDS_FILE;
use sheet_sql_sdk::{
    ColumnMapping, ConfigStore, FileSystemStorageBackend, NewExcelConfig, NewWorkRecord,
    OperationType, Row, SqlGenerator, StorageBackend, StoreError, StoredConfig, WorkRecordStore,
};
use tempfile::TempDir;

fn new_record(name: &str, ids: &[i64]) -> NewWorkRecord {
    NewWorkRecord {
        name: name.to_string(),
        excel_data: ids.iter().map(|id| Row::new().with("ID", json!(id))).collect(),
        columns: vec!["ID".to_string()],
        ..Default::default()
    }
}

mod work_record_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_records_persist_across_instances() {
        let temp = TempDir::new().unwrap();
        let saved = {
            let store = WorkRecordStore::new(FileSystemStorageBackend::new(temp.path()));
            store.save(new_record("jan", &[1, 2])).await.unwrap()
        };

        let reopened = WorkRecordStore::new(FileSystemStorageBackend::new(temp.path()));
        let listed = reopened.list().await.unwrap();
        assert_eq!(listed, vec![saved.clone()]);

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(temp.path().join(WORK_RECORDS_FILE)).unwrap())
                .unwrap();
        assert_eq!(raw[&saved.id]["status"], json!("uploaded"));
        assert_eq!(raw[&saved.id]["recordCount"], json!(2));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let temp = TempDir::new().unwrap();
        let store = WorkRecordStore::new(FileSystemStorageBackend::new(temp.path()));

        let older = store.save(new_record("a", &[1])).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = store.save(new_record("b", &[2])).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_empty_and_recovers() {
        let temp = TempDir::new().unwrap();
        let backend = FileSystemStorageBackend::new(temp.path());
        backend
            .write_file(WORK_RECORDS_FILE, b"{ truncated")
            .await
            .unwrap();

        let store = WorkRecordStore::new(backend);
        assert!(store.list().await.unwrap().is_empty());

        store.save(new_record("fresh", &[1])).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_then_generate() {
        let temp = TempDir::new().unwrap();
        let store = WorkRecordStore::new(FileSystemStorageBackend::new(temp.path()));

        let first = store.save(new_record("a", &[1, 2])).await.unwrap();
        let second = store.save(new_record("b", &[3])).await.unwrap();

        let mapping = vec![ColumnMapping::new("id").with_source("ID").with_type("int")];
        store
            .update(
                &second.id,
                json!({
                    "targetTable": "items",
                    "mapping": serde_json::to_value(&mapping).unwrap(),
                    "operationType": "insert"
                }),
            )
            .await
            .unwrap();

        let ids = vec![first.id.clone(), second.id.clone()];
        let batch = store.generate(&ids, &SqlGenerator::new()).await.unwrap();

        assert_eq!(batch.target_table, "items");
        assert_eq!(batch.operation_type, OperationType::Insert);
        assert_eq!(batch.record_count, 3);
        assert_eq!(
            batch.sql_statements,
            "INSERT INTO items (id)\nVALUES (1),\n       (2),\n       (3);"
        );
    }

    #[tokio::test]
    async fn test_missing_record_errors() {
        let temp = TempDir::new().unwrap();
        let store = WorkRecordStore::new(FileSystemStorageBackend::new(temp.path()));

        assert!(matches!(
            store.get("work_x_1").await,
            Err(StoreError::RecordNotFound(_))
        ));
        assert!(matches!(
            store.delete("work_x_1").await,
            Err(StoreError::RecordNotFound(_))
        ));
    }
}

mod config_store_tests {
    use super::*;

    #[tokio::test]
    async fn test_spreadsheet_entries_in_existing_document() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(CONFIGS_FILE),
            serde_json::to_vec_pretty(&json!({
                "excel_orders": {
                    "type": "excel",
                    "excelData": [{"SKU": "A-1"}, {"SKU": "A-2"}],
                    "columns": ["SKU"],
                    "originalFileName": "orders.xlsx",
                    "worksheet": "Sheet1",
                    "mapping": [{"dbColumn": "sku", "excelColumn": "SKU", "isKey": null}],
                    "createdAt": "2024-05-01T09:00:00.000Z",
                    "updatedAt": "2024-05-01T09:00:00.000Z"
                }
            }))
            .unwrap(),
        )
        .unwrap();
        let store = ConfigStore::new(FileSystemStorageBackend::new(temp.path()));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(matches!(listed[0].1, StoredConfig::Excel(_)));

        let sheet = store.get_excel("excel_orders").await.unwrap();
        assert_eq!(sheet.excel_data.len(), 2);
        assert_eq!(sheet.worksheet.as_deref(), Some("Sheet1"));
    }

    #[tokio::test]
    async fn test_saved_sheets_merge_into_statements() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(FileSystemStorageBackend::new(temp.path()));

        let mut keys = Vec::new();
        for (name, ids) in [("jan", [1, 2]), ("feb", [3, 4])] {
            let key = store
                .save_excel(NewExcelConfig {
                    name: name.to_string(),
                    excel_data: ids.iter().map(|id| Row::new().with("ID", json!(id))).collect(),
                    mapping: Some(vec![
                        ColumnMapping::new("id").with_source("ID").with_type("int"),
                    ]),
                    ..Default::default()
                })
                .await
                .unwrap();
            keys.push(key);
        }

        let reopened = ConfigStore::new(FileSystemStorageBackend::new(temp.path()));
        let request = reopened
            .merge(&keys)
            .await
            .unwrap()
            .into_request("items", OperationType::Insert);
        assert_eq!(
            SqlGenerator::new().generate(&request).unwrap(),
            "INSERT INTO items (id)\nVALUES (1),\n       (2),\n       (3),\n       (4);"
        );
    }
}
