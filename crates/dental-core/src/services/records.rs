//! Recommendation record store

use crate::ports::RecommendationRepository;
use crate::{Result, StoreError};
use dental_types::{NewRecommendation, RecommendationPatch, RecommendationRecord};
use std::sync::Arc;
use tracing::{debug, info};

const NOT_FOUND: &str = "Recommendation not found";

/// Validating CRUD over recommendation records.
///
/// Holds no state between calls; every operation is one round trip to the
/// repository.
#[derive(Clone)]
pub struct RecordStore {
    repo: Arc<dyn RecommendationRepository>,
}

impl RecordStore {
    pub fn new(repo: Arc<dyn RecommendationRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new: NewRecommendation) -> Result<RecommendationRecord> {
        validate_new(&new)?;

        let record = self.repo.insert_recommendation(&new).await?;
        info!(
            "Created recommendation: id={}, business={}",
            record.id, record.business_name
        );
        Ok(record)
    }

    pub async fn read(&self, id: i64) -> Result<RecommendationRecord> {
        validate_id(id)?;
        debug!("Reading recommendation {}", id);

        self.repo
            .get_recommendation(id)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn update(&self, id: i64, patch: RecommendationPatch) -> Result<RecommendationRecord> {
        validate_id(id)?;
        validate_patch(&patch)?;

        let record = self
            .repo
            .update_recommendation(id, &patch)
            .await?
            .ok_or_else(not_found)?;

        let changed: Vec<_> = patch.assignments().iter().map(|(f, _)| f.column()).collect();
        info!("Updated recommendation {}: {}", id, changed.join(", "));
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<RecommendationRecord>> {
        let records = self.repo.list_recommendations().await?;
        debug!("Listed {} recommendations", records.len());
        Ok(records)
    }

    pub async fn delete(&self, id: i64) -> Result<RecommendationRecord> {
        validate_id(id)?;

        let record = self
            .repo
            .delete_recommendation(id)
            .await?
            .ok_or_else(not_found)?;
        info!("Deleted recommendation {}", id);
        Ok(record)
    }
}

fn not_found() -> StoreError {
    StoreError::NotFound(NOT_FOUND.to_string())
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_id(id: i64) -> Result<()> {
    if id <= 0 {
        return Err(StoreError::validation("Missing id"));
    }
    Ok(())
}

fn validate_new(new: &NewRecommendation) -> Result<()> {
    if is_blank(&new.business_name) || is_blank(&new.address) || is_blank(&new.recommendation_reason)
    {
        return Err(StoreError::validation("Missing required fields"));
    }

    if let Some(rating) = new.rating {
        if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
            return Err(StoreError::validation(format!(
                "Rating must be between 0 and 5, got {}",
                rating
            )));
        }
    }

    Ok(())
}

fn validate_patch(patch: &RecommendationPatch) -> Result<()> {
    let assignments = patch.assignments();
    if assignments.is_empty() {
        return Err(StoreError::validation("No fields to update"));
    }

    if let Some((field, _)) = assignments
        .iter()
        .find(|(field, value)| field.is_required() && is_blank(value))
    {
        return Err(StoreError::validation(format!("{} cannot be empty", field)));
    }

    Ok(())
}
