//! Keyed API settings store

use crate::ports::SettingsRepository;
use crate::{Result, StoreError};
use dental_types::{ApiKeys, SettingKey, SettingValues, SettingsStatus};
use std::sync::Arc;
use tracing::{debug, info};

/// Reads and idempotently writes the tracked API-key settings.
///
/// Consumers that need a key receive this store rather than reading
/// the environment.
#[derive(Clone)]
pub struct KeyedSettingsStore {
    repo: Arc<dyn SettingsRepository>,
}

impl KeyedSettingsStore {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Current value for each requested key; unset keys map to `""`.
    pub async fn get_many(&self, keys: &[SettingKey]) -> Result<SettingValues> {
        if keys.is_empty() {
            return Err(StoreError::validation("No setting keys requested"));
        }

        let mut wanted = keys.to_vec();
        wanted.sort();
        wanted.dedup();

        let entries = self.repo.get_settings(&wanted).await?;
        debug!("Loaded {} of {} settings", entries.len(), wanted.len());

        let mut values: SettingValues = wanted.iter().map(|k| (*k, String::new())).collect();
        for entry in entries {
            if let Some(slot) = values.get_mut(&entry.key_name) {
                *slot = entry.key_value;
            }
        }
        Ok(values)
    }

    /// Replace every tracked key in one transaction.
    ///
    /// The payload must carry all tracked keys with non-empty values.
    pub async fn set_all(&self, values: SettingValues) -> Result<()> {
        let missing: Vec<&str> = SettingKey::ALL
            .iter()
            .filter(|k| !values.contains_key(*k))
            .map(|k| k.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(StoreError::validation(format!(
                "All API keys are required (missing: {})",
                missing.join(", ")
            )));
        }

        if let Some((key, _)) = values.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(StoreError::validation(format!("{} cannot be empty", key)));
        }

        self.repo.upsert_settings(&values).await?;
        info!(
            "Saved settings: {}",
            values.keys().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        );
        Ok(())
    }

    /// All tracked keys as a typed view.
    pub async fn api_keys(&self) -> Result<ApiKeys> {
        let values = self.get_many(&SettingKey::ALL).await?;
        Ok(ApiKeys::from_values(&values))
    }

    /// The value of one key, or `Unconfigured` when it is unset.
    ///
    /// Entry point for anything that consumes a key (`GET /api/settings/:key`).
    pub async fn require(&self, key: SettingKey) -> Result<String> {
        let mut values = self.get_many(&[key]).await?;
        match values.remove(&key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(StoreError::Unconfigured(key)),
        }
    }

    pub async fn status(&self) -> Result<SettingsStatus> {
        let keys = self.api_keys().await?;
        Ok(SettingsStatus::from(&keys))
    }
}
