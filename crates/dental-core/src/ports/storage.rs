//! Storage traits for persistence
//!
//! Repositories report absence as `None`; turning that into a not-found
//! error is the stores' job.

use crate::Result;
use async_trait::async_trait;
use dental_types::{
    NewRecommendation, RecommendationPatch, RecommendationRecord, SettingKey, SettingValues,
    SettingsEntry,
};

/// Recommendation store
#[async_trait]
pub trait RecommendationRepository: Send + Sync {
    /// Insert one row; the repository assigns `id`, `created_at` and `updated_at`.
    async fn insert_recommendation(&self, new: &NewRecommendation)
        -> Result<RecommendationRecord>;
    async fn get_recommendation(&self, id: i64) -> Result<Option<RecommendationRecord>>;
    /// Change only the patch's present fields and refresh `updated_at` in one write.
    async fn update_recommendation(
        &self,
        id: i64,
        patch: &RecommendationPatch,
    ) -> Result<Option<RecommendationRecord>>;
    /// All rows, newest created first.
    async fn list_recommendations(&self) -> Result<Vec<RecommendationRecord>>;
    /// Remove one row, returning it as it was before removal.
    async fn delete_recommendation(&self, id: i64) -> Result<Option<RecommendationRecord>>;
}

/// Keyed settings store
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Stored entries for the requested keys. Unset keys are simply absent.
    async fn get_settings(&self, keys: &[SettingKey]) -> Result<Vec<SettingsEntry>>;
    /// Upsert every entry atomically: all apply or none do.
    async fn upsert_settings(&self, values: &SettingValues) -> Result<()>;
}
