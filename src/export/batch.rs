//! Merging saved work records and spreadsheet configs

use serde::Serialize;
use tracing::debug;

use crate::export::MergeError;
use crate::models::{ColumnMapping, ExcelConfig, GenerationRequest, OperationType, Row, WorkRecord};

/// Result of generating statements for several work records at once
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGeneration {
    pub sql_statements: String,
    /// Total rows across all merged records
    pub record_count: usize,
    pub target_table: String,
    pub operation_type: OperationType,
}

/// Merge work records into a single request.
///
/// Rows of every record are concatenated in record order. The first record
/// with a non-empty target table supplies the table, the mapping and the
/// operation (`insert` when unset); later records contribute rows only.
pub fn merge_work_records(records: &[WorkRecord]) -> Result<GenerationRequest, MergeError> {
    if records.is_empty() {
        return Err(MergeError::NoRecordsFound);
    }

    let data = records
        .iter()
        .flat_map(|r| r.excel_data.iter().cloned())
        .collect::<Vec<_>>();

    let Some(lead) = records.iter().find(|r| r.target_table().is_some()) else {
        return Err(MergeError::MissingMapping);
    };
    let Some(mapping) = lead.mapping.clone() else {
        return Err(MergeError::MissingMapping);
    };

    debug!(
        "Merged {} work record(s) into {} row(s) for table {} (from {})",
        records.len(),
        data.len(),
        lead.target_table().unwrap_or_default(),
        lead.id
    );

    Ok(GenerationRequest::new(
        lead.target_table().unwrap_or_default(),
        lead.operation_type.unwrap_or_default(),
        mapping,
        data,
    ))
}

/// Rows and mapping combined from several spreadsheet configs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedConfigs {
    pub excel_data: Vec<Row>,
    pub mapping: Vec<ColumnMapping>,
}

impl MergedConfigs {
    /// Turn the merged data into a request against `table`
    pub fn into_request(
        self,
        table: impl Into<String>,
        operation: OperationType,
    ) -> GenerationRequest {
        GenerationRequest::new(table, operation, self.mapping, self.excel_data)
    }
}

/// Merge spreadsheet configs.
///
/// Rows are concatenated in config order. Mappings are overlaid by
/// position: entry `i` of a later config replaces entry `i` of an earlier
/// one, and a longer mapping extends the result.
pub fn merge_excel_configs(configs: &[ExcelConfig]) -> Result<MergedConfigs, MergeError> {
    if configs.is_empty() {
        return Err(MergeError::NoConfigsFound);
    }

    let mut excel_data = Vec::new();
    let mut mapping: Vec<ColumnMapping> = Vec::new();
    for config in configs {
        excel_data.extend(config.excel_data.iter().cloned());
        for (i, entry) in config.mapping.iter().flatten().enumerate() {
            match mapping.get_mut(i) {
                Some(slot) => *slot = entry.clone(),
                None => mapping.push(entry.clone()),
            }
        }
    }

    debug!(
        "Merged {} spreadsheet config(s) into {} row(s) and {} mapping(s)",
        configs.len(),
        excel_data.len(),
        mapping.len()
    );

    Ok(MergedConfigs {
        excel_data,
        mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExcelConfigKind, NewExcelConfig};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(name: &str, ids: &[i64]) -> WorkRecord {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let rows = ids.iter().map(|id| Row::new().with("ID", json!(id))).collect();
        WorkRecord::new(name, rows, now)
    }

    fn id_mapping() -> Vec<ColumnMapping> {
        vec![ColumnMapping::new("id").with_source("ID").with_type("int")]
    }

    #[test]
    fn test_first_target_wins() {
        let records = vec![
            record("a", &[1]),
            record("b", &[2, 3]).with_target("orders", id_mapping(), OperationType::Upsert),
            record("c", &[4]).with_target("other", vec![], OperationType::Delete),
        ];
        let merged = merge_work_records(&records).unwrap();

        assert_eq!(merged.table_name, "orders");
        assert_eq!(merged.operation_type, OperationType::Upsert);
        assert_eq!(merged.mapping, id_mapping());
        assert_eq!(merged.data.len(), 4);
        assert_eq!(merged.data[0].get("ID"), Some(&json!(1)));
    }

    #[test]
    fn test_missing_operation_defaults_to_insert() {
        let mut lead = record("a", &[1]).with_target("orders", id_mapping(), OperationType::Update);
        lead.operation_type = None;
        let merged = merge_work_records(&[lead]).unwrap();
        assert_eq!(merged.operation_type, OperationType::Insert);
    }

    #[test]
    fn test_merge_errors() {
        assert_eq!(merge_work_records(&[]), Err(MergeError::NoRecordsFound));
        assert_eq!(
            merge_work_records(&[record("a", &[1])]),
            Err(MergeError::MissingMapping)
        );

        let mut no_mapping = record("a", &[1]).with_target("orders", vec![], OperationType::Insert);
        no_mapping.mapping = None;
        assert_eq!(merge_work_records(&[no_mapping]), Err(MergeError::MissingMapping));
    }

    fn excel(name: &str, skus: &[&str], mapping: Vec<ColumnMapping>) -> ExcelConfig {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        NewExcelConfig {
            name: name.to_string(),
            excel_data: skus.iter().map(|s| Row::new().with("SKU", json!(s))).collect(),
            mapping: Some(mapping),
            ..Default::default()
        }
        .into_config(now)
    }

    #[test]
    fn test_configs_concatenate_rows_and_overlay_mappings() {
        let configs = vec![
            excel(
                "a",
                &["A-1"],
                vec![
                    ColumnMapping::new("sku").with_source("SKU"),
                    ColumnMapping::new("qty").with_source("Qty"),
                ],
            ),
            excel(
                "b",
                &["B-1", "B-2"],
                vec![ColumnMapping::new("code").with_source("SKU").with_key(true)],
            ),
        ];
        let merged = merge_excel_configs(&configs).unwrap();

        assert_eq!(merged.excel_data.len(), 3);
        assert_eq!(merged.excel_data[2].get("SKU"), Some(&json!("B-2")));
        assert_eq!(
            merged.mapping,
            vec![
                ColumnMapping::new("code").with_source("SKU").with_key(true),
                ColumnMapping::new("qty").with_source("Qty"),
            ]
        );
    }

    #[test]
    fn test_configs_without_mapping_contribute_rows() {
        let mut bare = excel("bare", &["X"], vec![]);
        bare.mapping = None;
        assert_eq!(bare.kind, ExcelConfigKind::Excel);

        let merged = merge_excel_configs(&[bare]).unwrap();
        assert_eq!(merged.excel_data.len(), 1);
        assert!(merged.mapping.is_empty());
        assert_eq!(merge_excel_configs(&[]), Err(MergeError::NoConfigsFound));
    }

    #[test]
    fn test_merged_configs_into_request() {
        let configs = vec![excel(
            "a",
            &["A-1"],
            vec![ColumnMapping::new("sku").with_source("SKU")],
        )];
        let request = merge_excel_configs(&configs)
            .unwrap()
            .into_request("products", OperationType::Insert);

        assert_eq!(request.table_name, "products");
        assert_eq!(request.data.len(), 1);
        assert_eq!(
            serde_json::to_value(MergedConfigs {
                excel_data: vec![],
                mapping: vec![],
            })
            .unwrap(),
            json!({"excelData": [], "mapping": []})
        );
    }
}
