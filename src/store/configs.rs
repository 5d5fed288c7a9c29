//! Named connection and spreadsheet configs

use chrono::Utc;
use tracing::{info, warn};

use super::{StoreError, StoreResult, load_object, save_object};
use crate::export::{MergedConfigs, merge_excel_configs};
use crate::models::{DbConfig, ExcelConfig, NewExcelConfig, StoredConfig};
use crate::storage::StorageBackend;

/// Document holding every config, keyed by name
pub const CONFIGS_FILE: &str = "db-configs.json";

pub struct ConfigStore<B> {
    backend: B,
}

impl<B: StorageBackend> ConfigStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Create or replace the connection config stored under `name`
    pub async fn save(&self, name: &str, config: &DbConfig) -> StoreResult<()> {
        let mut configs = load_object(&self.backend, CONFIGS_FILE).await?;
        configs.insert(name.to_string(), serde_json::to_value(config)?);
        save_object(&self.backend, CONFIGS_FILE, &configs).await?;

        info!("Saved connection config {}", name);
        Ok(())
    }

    /// Save a spreadsheet under `excel_<name>`, replacing any earlier one.
    ///
    /// Returns the key it was stored under.
    pub async fn save_excel(&self, input: NewExcelConfig) -> StoreResult<String> {
        let key = input.key();
        let config = input.into_config(Utc::now());

        let mut configs = load_object(&self.backend, CONFIGS_FILE).await?;
        configs.insert(key.clone(), serde_json::to_value(&config)?);
        save_object(&self.backend, CONFIGS_FILE, &configs).await?;

        info!(
            "Saved spreadsheet config {} ({} row(s))",
            key,
            config.excel_data.len()
        );
        Ok(key)
    }

    /// Every readable config with its name, in stored order.
    ///
    /// Entries that are neither kind of config are skipped.
    pub async fn list(&self) -> StoreResult<Vec<(String, StoredConfig)>> {
        let configs = load_object(&self.backend, CONFIGS_FILE).await?;
        Ok(configs
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value(value) {
                Ok(config) => Some((name, config)),
                Err(e) => {
                    warn!("Skipping config {}: {}", name, e);
                    None
                }
            })
            .collect())
    }

    pub async fn get(&self, name: &str) -> StoreResult<StoredConfig> {
        let configs = load_object(&self.backend, CONFIGS_FILE).await?;
        let value = configs
            .get(name)
            .ok_or_else(|| StoreError::ConfigNotFound(name.to_string()))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Spreadsheet config stored under `key` (`excel_<name>`)
    pub async fn get_excel(&self, key: &str) -> StoreResult<ExcelConfig> {
        match self.get(key).await? {
            StoredConfig::Excel(config) => Ok(config),
            other => Err(StoreError::ConfigKindMismatch {
                name: key.to_string(),
                found: other.kind_name(),
                expected: "excel",
            }),
        }
    }

    /// Combine the spreadsheet configs stored under `keys`.
    ///
    /// Missing keys and connection configs are skipped with a warning.
    pub async fn merge(&self, keys: &[String]) -> StoreResult<MergedConfigs> {
        let configs = load_object(&self.backend, CONFIGS_FILE).await?;

        let mut selected = Vec::with_capacity(keys.len());
        for key in keys {
            let Some(value) = configs.get(key) else {
                warn!("Config {} not found, skipping", key);
                continue;
            };
            match serde_json::from_value::<StoredConfig>(value.clone()) {
                Ok(StoredConfig::Excel(config)) => selected.push(config),
                Ok(other) => warn!(
                    "Config {} is a {} config, skipping",
                    key,
                    other.kind_name()
                ),
                Err(e) => warn!("Skipping config {}: {}", key, e),
            }
        }

        merge_excel_configs(&selected).map_err(|e| StoreError::Generate(e.into()))
    }

    /// Remove a config. Returns whether one was stored under `name`.
    pub async fn delete(&self, name: &str) -> StoreResult<bool> {
        let mut configs = load_object(&self.backend, CONFIGS_FILE).await?;
        if configs.remove(name).is_none() {
            return Ok(false);
        }
        save_object(&self.backend, CONFIGS_FILE, &configs).await?;

        info!("Deleted config {}", name);
        Ok(true)
    }
}
