//! In-memory repository (no external storage)
//!
//! A single `RwLock` guards all state, so every write is atomic with respect
//! to readers, including multi-key settings upserts.

use crate::ports::{RecommendationRepository, SettingsRepository};
use crate::Result;
use async_trait::async_trait;
use chrono::Utc;
use dental_types::{
    NewRecommendation, RecommendationPatch, RecommendationRecord, SettingKey, SettingValues,
    SettingsEntry,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

pub struct MemoryRepository {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    recommendations: BTreeMap<i64, RecommendationRecord>,
    settings: BTreeMap<SettingKey, SettingsEntry>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecommendationRepository for MemoryRepository {
    async fn insert_recommendation(
        &self,
        new: &NewRecommendation,
    ) -> Result<RecommendationRecord> {
        let mut state = self.state.write().await;
        state.last_id += 1;

        let now = Utc::now();
        let record = RecommendationRecord {
            id: state.last_id,
            business_name: new.business_name.clone(),
            address: new.address.clone(),
            website_url: new.website_url.clone(),
            telephone: new.telephone.clone(),
            recommendation_reason: new.recommendation_reason.clone(),
            rating: new.rating,
            services: new.services.clone(),
            created_at: now,
            updated_at: now,
        };
        state.recommendations.insert(record.id, record.clone());

        Ok(record)
    }

    async fn get_recommendation(&self, id: i64) -> Result<Option<RecommendationRecord>> {
        Ok(self.state.read().await.recommendations.get(&id).cloned())
    }

    async fn update_recommendation(
        &self,
        id: i64,
        patch: &RecommendationPatch,
    ) -> Result<Option<RecommendationRecord>> {
        let mut state = self.state.write().await;
        let Some(record) = state.recommendations.get_mut(&id) else {
            return Ok(None);
        };

        patch.apply_to(record);
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn list_recommendations(&self) -> Result<Vec<RecommendationRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<_> = state.recommendations.values().cloned().collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }

    async fn delete_recommendation(&self, id: i64) -> Result<Option<RecommendationRecord>> {
        Ok(self.state.write().await.recommendations.remove(&id))
    }
}

#[async_trait]
impl SettingsRepository for MemoryRepository {
    async fn get_settings(&self, keys: &[SettingKey]) -> Result<Vec<SettingsEntry>> {
        let state = self.state.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| state.settings.get(k).cloned())
            .collect())
    }

    async fn upsert_settings(&self, values: &SettingValues) -> Result<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        for (key, value) in values {
            state.settings.insert(
                *key,
                SettingsEntry {
                    key_name: *key,
                    key_value: value.clone(),
                    updated_at: now,
                },
            );
        }
        Ok(())
    }
}
