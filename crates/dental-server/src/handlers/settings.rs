//! Settings handlers
//!
//! Values are API keys; they are returned to the settings page but never logged.

use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use dental_core::{SettingKey, SettingsRequest, SettingsStatus, SuccessResponse};
use serde_json::json;

pub async fn dispatch(
    State(state): State<AppState>,
    payload: Result<Json<SettingsRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;

    match req {
        SettingsRequest::Get => get(State(state)).await,
        SettingsRequest::Set(values) => {
            state.settings.set_all(values).await?;
            Ok(Json(SuccessResponse { success: true }).into_response())
        }
    }
}

pub async fn get(State(state): State<AppState>) -> Result<Response, ApiError> {
    let keys = state.settings.api_keys().await?;
    Ok(Json(keys).into_response())
}

pub async fn status(State(state): State<AppState>) -> Result<Json<SettingsStatus>, ApiError> {
    Ok(Json(state.settings.status().await?))
}

/// One key for a consumer that cannot proceed without it; unset is 409.
pub async fn require(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, ApiError> {
    let key = key
        .parse::<SettingKey>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let value = state.settings.require(key).await?;
    Ok(Json(json!({ (key.as_str()): value })).into_response())
}
