//! API settings types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Setting names tracked by the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    #[serde(rename = "googleMaps")]
    GoogleMaps,
    #[serde(rename = "yelp")]
    Yelp,
}

impl SettingKey {
    /// Every tracked key, in storage order
    pub const ALL: [SettingKey; 2] = [SettingKey::GoogleMaps, SettingKey::Yelp];

    /// Name stored in the `key_name` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::GoogleMaps => "googleMaps",
            SettingKey::Yelp => "yelp",
        }
    }

    /// Human readable service name
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::GoogleMaps => "Google Maps",
            SettingKey::Yelp => "Yelp",
        }
    }
}

impl std::fmt::Display for SettingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown setting key: {0}")]
pub struct UnknownSettingKey(pub String);

impl std::str::FromStr for SettingKey {
    type Err = UnknownSettingKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownSettingKey(s.to_string()))
    }
}

/// One stored setting row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEntry {
    pub key_name: SettingKey,
    pub key_value: String,
    pub updated_at: DateTime<Utc>,
}

/// Values keyed by setting name
pub type SettingValues = BTreeMap<SettingKey, String>;

/// Typed view of the configured third-party API keys.
///
/// Unset keys are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeys {
    pub google_maps: String,
    pub yelp: String,
}

impl ApiKeys {
    pub fn from_values(values: &SettingValues) -> Self {
        let get = |key: SettingKey| values.get(&key).cloned().unwrap_or_default();
        Self {
            google_maps: get(SettingKey::GoogleMaps),
            yelp: get(SettingKey::Yelp),
        }
    }
}

/// Which keys are configured, without exposing their values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsStatus {
    pub google_maps: bool,
    pub yelp: bool,
}

impl From<&ApiKeys> for SettingsStatus {
    fn from(keys: &ApiKeys) -> Self {
        Self {
            google_maps: !keys.google_maps.is_empty(),
            yelp: !keys.yelp.is_empty(),
        }
    }
}
