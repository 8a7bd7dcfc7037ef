//! Recommendation handlers

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use dental_core::{RecommendationListResponse, RecommendationRequest, RecommendationResponse};
use tracing::debug;

/// Dispatch one `method`-tagged recommendation request.
pub async fn dispatch(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    debug!("Recommendation request: {}", req.method());

    let records = &state.records;
    let recommendation = match req {
        RecommendationRequest::List => {
            let recommendations = records.list().await?;
            return Ok(Json(RecommendationListResponse { recommendations }).into_response());
        }
        RecommendationRequest::Create(new) => records.create(new).await?,
        RecommendationRequest::Read { id } => records.read(id).await?,
        RecommendationRequest::Update { id, patch } => records.update(id, patch).await?,
        RecommendationRequest::Delete { id } => records.delete(id).await?,
    };

    Ok(Json(RecommendationResponse { recommendation }).into_response())
}

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let recommendations = state.records.list().await?;
    Ok(Json(RecommendationListResponse { recommendations }).into_response())
}
