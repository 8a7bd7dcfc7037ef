//! Request/response envelopes for the HTTP surface

use super::{NewRecommendation, RecommendationPatch, RecommendationRecord, SettingValues};
use serde::{Deserialize, Serialize};

/// Recommendation operations, selected by `method`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum RecommendationRequest {
    Create(NewRecommendation),
    Read {
        #[serde(default)]
        id: i64,
    },
    Update {
        #[serde(default)]
        id: i64,
        #[serde(flatten)]
        patch: RecommendationPatch,
    },
    List,
    Delete {
        #[serde(default)]
        id: i64,
    },
}

impl RecommendationRequest {
    pub fn method(&self) -> &'static str {
        match self {
            RecommendationRequest::Create(_) => "CREATE",
            RecommendationRequest::Read { .. } => "READ",
            RecommendationRequest::Update { .. } => "UPDATE",
            RecommendationRequest::List => "LIST",
            RecommendationRequest::Delete { .. } => "DELETE",
        }
    }
}

/// Settings operations, selected by `method`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "UPPERCASE")]
pub enum SettingsRequest {
    Get,
    #[serde(alias = "POST")]
    Set(SettingValues),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendation: RecommendationRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationListResponse {
    pub recommendations: Vec<RecommendationRecord>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error body returned by every failing route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
