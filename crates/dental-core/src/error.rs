//! Error types for the stores

use dental_types::SettingKey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Caller supplied missing or malformed input. Never reaches storage.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Storage engine failure, surfaced as-is
    #[error("Storage error: {0}")]
    Infrastructure(String),

    #[error("{} API key not configured", .0.label())]
    Unconfigured(SettingKey),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        StoreError::Validation(msg.into())
    }

    pub fn infrastructure(msg: impl std::fmt::Display) -> Self {
        StoreError::Infrastructure(msg.to_string())
    }

    /// Stable code for programmatic handling
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Validation(_) => "validation",
            StoreError::NotFound(_) => "not_found",
            StoreError::Infrastructure(_) => "infrastructure",
            StoreError::Unconfigured(_) => "unconfigured",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Infrastructure(format!("Serialization error: {}", e))
    }
}
