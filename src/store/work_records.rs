//! Work record persistence

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::{StoreError, StoreResult, load_object, save_object};
use crate::export::{BatchGeneration, SqlGenerator, ValueFormatter};
use crate::models::{NewWorkRecord, WorkRecord};
use crate::storage::StorageBackend;

/// Document holding every work record, keyed by id
pub const WORK_RECORDS_FILE: &str = "work-records.json";

/// Saved spreadsheets with their mappings and target tables
pub struct WorkRecordStore<B> {
    backend: B,
}

impl<B: StorageBackend> WorkRecordStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    fn parse(id: &str, value: &Value) -> Option<WorkRecord> {
        match serde_json::from_value::<WorkRecord>(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable work record {}: {}", id, e);
                None
            }
        }
    }

    /// Save a new record and return it as stored
    pub async fn save(&self, input: NewWorkRecord) -> StoreResult<WorkRecord> {
        let record = input.into_record(Utc::now());
        let mut records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        records.insert(record.id.clone(), serde_json::to_value(&record)?);
        save_object(&self.backend, WORK_RECORDS_FILE, &records).await?;

        info!(
            "Saved work record {} ({} row(s))",
            record.id, record.record_count
        );
        Ok(record)
    }

    /// All readable records, newest first
    pub async fn list(&self) -> StoreResult<Vec<WorkRecord>> {
        let records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        let mut list: Vec<WorkRecord> = records
            .iter()
            .filter_map(|(id, value)| Self::parse(id, value))
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub async fn get(&self, id: &str) -> StoreResult<WorkRecord> {
        let records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        let value = records
            .get(id)
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Overlay `changes` onto a record and bump its `updatedAt`.
    ///
    /// Top-level fields present in `changes` replace the stored ones; all
    /// other fields are kept. The id never changes.
    pub async fn update(&self, id: &str, changes: Value) -> StoreResult<WorkRecord> {
        let Value::Object(changes) = changes else {
            return Err(StoreError::InvalidUpdate(
                "changes must be a JSON object".to_string(),
            ));
        };

        let mut records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        let Some(Value::Object(current)) = records.get(id) else {
            return Err(StoreError::RecordNotFound(id.to_string()));
        };

        let mut merged = current.clone();
        merged.extend(changes);
        merged.insert("id".to_string(), Value::String(id.to_string()));
        merged.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);

        let merged = Value::Object(merged);
        let record: WorkRecord = serde_json::from_value(merged.clone())
            .map_err(|e| StoreError::InvalidUpdate(e.to_string()))?;

        records.insert(id.to_string(), merged);
        save_object(&self.backend, WORK_RECORDS_FILE, &records).await?;

        info!("Updated work record {}", id);
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        if records.remove(id).is_none() {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }
        save_object(&self.backend, WORK_RECORDS_FILE, &records).await?;

        info!("Deleted work record {}", id);
        Ok(())
    }

    /// Generate statements for the records named by `ids`, in `ids` order.
    ///
    /// Unknown ids are skipped; if none remain the merge fails with
    /// `MergeError::NoRecordsFound`.
    pub async fn generate<F: ValueFormatter>(
        &self,
        ids: &[String],
        generator: &SqlGenerator<F>,
    ) -> StoreResult<BatchGeneration> {
        let records = load_object(&self.backend, WORK_RECORDS_FILE).await?;
        let selected: Vec<WorkRecord> = ids
            .iter()
            .filter_map(|id| match records.get(id) {
                Some(value) => Self::parse(id, value),
                None => {
                    warn!("Work record {} not found, skipping", id);
                    None
                }
            })
            .collect();

        Ok(generator.generate_batch(&selected)?)
    }
}
