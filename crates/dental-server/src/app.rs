//! Application state and router

use crate::configuration::{ServerConfig, StorageBackend};
use crate::handlers;
use crate::storage::Database;
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use dental_core::{KeyedSettingsStore, MemoryRepository, RecordStore};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// `database_path` value selecting a private in-memory SQLite database
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub records: RecordStore,
    pub settings: KeyedSettingsStore,
}

impl AppState {
    /// Build both stores over the configured backend.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        info!("Initializing {} storage...", config.storage);
        let state = match config.storage {
            StorageBackend::Sqlite => {
                let db = if config.database_path == IN_MEMORY_PATH {
                    Database::in_memory().await
                } else {
                    Database::new(&config.database_path).await
                };
                let db = Arc::new(db.context("Failed to initialize database")?);
                info!("SQLite database initialized at: {}", config.database_path);
                Self::with_sqlite(db)
            }
            StorageBackend::Memory => Self::with_memory(),
        };
        Ok(state)
    }

    pub fn with_sqlite(db: Arc<Database>) -> Self {
        Self {
            records: RecordStore::new(db.clone()),
            settings: KeyedSettingsStore::new(db),
        }
    }

    pub fn with_memory() -> Self {
        let repo = Arc::new(MemoryRepository::new());
        Self {
            records: RecordStore::new(repo.clone()),
            settings: KeyedSettingsStore::new(repo),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recommendations",
            get(handlers::recommendations::list).post(handlers::recommendations::dispatch),
        )
        .route(
            "/settings",
            get(handlers::settings::get).post(handlers::settings::dispatch),
        )
        .route("/settings/status", get(handlers::settings::status))
        .route("/settings/:key", get(handlers::settings::require))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                builder = builder.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn sqlite_app() -> Router {
        let db = Arc::new(Database::in_memory().await.unwrap());
        build_router(AppState::with_sqlite(db))
    }

    #[tokio::test]
    async fn test_state_from_config() {
        let mut config = ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            database_path: IN_MEMORY_PATH.to_string(),
            storage: StorageBackend::Sqlite,
            log_level: "info".to_string(),
        };
        let state = AppState::from_config(&config).await.unwrap();
        assert!(state.records.list().await.unwrap().is_empty());

        config.storage = StorageBackend::Memory;
        let state = AppState::from_config(&config).await.unwrap();
        assert_eq!(state.settings.api_keys().await.unwrap().yelp, "");
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(AppState::with_memory());
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_recommendation_lifecycle() {
        let app = sqlite_app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({
                "method": "CREATE",
                "business_name": "A",
                "address": "1 St",
                "recommendation_reason": "Great",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let created = &body["recommendation"];
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["services"], json!([]));
        assert_eq!(created["created_at"], created["updated_at"]);

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "UPDATE", "id": id, "telephone": "555-1212"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendation"]["telephone"], "555-1212");
        assert_eq!(body["recommendation"]["business_name"], "A");

        let (status, body) = call(&app, "GET", "/api/recommendations", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 1);

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "DELETE", "id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendation"]["id"], id);

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "READ", "id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Recommendation not found");
        assert_eq!(body["code"], "not_found");
    }

    #[tokio::test]
    async fn test_create_accepts_null_services() {
        let app = sqlite_app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({
                "method": "CREATE",
                "business_name": "A",
                "address": "B",
                "recommendation_reason": "C",
                "services": null,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recommendation"]["services"], json!([]));
    }

    #[tokio::test]
    async fn test_validation_errors_are_400() {
        let app = build_router(AppState::with_memory());

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "CREATE", "business_name": "", "address": "1 St", "recommendation_reason": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "UPDATE", "id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No fields to update");

        let (status, body) = call(
            &app,
            "POST",
            "/api/recommendations",
            Some(json!({"method": "PATCH"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        let (_, body) = call(&app, "GET", "/api/recommendations", None).await;
        assert_eq!(body["recommendations"], json!([]));
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let app = sqlite_app().await;

        let (status, body) = call(&app, "POST", "/api/settings", Some(json!({"method": "GET"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"googleMaps": "", "yelp": ""}));

        let (status, body) = call(
            &app,
            "POST",
            "/api/settings",
            Some(json!({"method": "SET", "googleMaps": "k1", "yelp": "k2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = call(
            &app,
            "POST",
            "/api/settings",
            Some(json!({"method": "POST", "googleMaps": "k1b", "yelp": "k2"})),
        )
        .await;
        assert_eq!(body, json!({"success": true}));

        let (_, body) = call(&app, "GET", "/api/settings", None).await;
        assert_eq!(body, json!({"googleMaps": "k1b", "yelp": "k2"}));

        let (_, body) = call(&app, "GET", "/api/settings/status", None).await;
        assert_eq!(body, json!({"googleMaps": true, "yelp": true}));
    }

    #[tokio::test]
    async fn test_settings_require_every_key() {
        let app = build_router(AppState::with_memory());

        let (status, body) = call(
            &app,
            "POST",
            "/api/settings",
            Some(json!({"method": "SET", "googleMaps": "k1"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        let (_, body) = call(&app, "GET", "/api/settings", None).await;
        assert_eq!(body, json!({"googleMaps": "", "yelp": ""}));
    }

    #[tokio::test]
    async fn test_single_key_unconfigured_is_409() {
        let app = build_router(AppState::with_memory());

        let (status, body) = call(&app, "GET", "/api/settings/yelp", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "unconfigured");
        assert_eq!(body["error"], "Yelp API key not configured");

        let (status, body) = call(&app, "GET", "/api/settings/facebook", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation");

        call(
            &app,
            "POST",
            "/api/settings",
            Some(json!({"method": "SET", "googleMaps": "g", "yelp": "y"})),
        )
        .await;
        let (status, body) = call(&app, "GET", "/api/settings/googleMaps", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"googleMaps": "g"}));
    }
}
