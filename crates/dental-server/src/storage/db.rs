//! SQLite database layer (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dental_core::{
    NewRecommendation, RecommendationPatch, RecommendationRecord, RecommendationRepository,
    SettingKey, SettingValues, SettingsEntry, SettingsRepository, StoreError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;
use std::sync::Arc;

const RECOMMENDATION_COLUMNS: &str = "id, business_name, address, website_url, telephone, \
     recommendation_reason, rating, services, created_at, updated_at";

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        // WAL lets readers proceed while a settings transaction is open
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database, one connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self> {
        tracing::info!("SQLite connection established, running migrations...");
        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Recommendations table
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS business_recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                business_name TEXT NOT NULL CHECK (length(trim(business_name)) > 0),
                address TEXT NOT NULL CHECK (length(trim(address)) > 0),
                website_url TEXT,
                telephone TEXT,
                recommendation_reason TEXT NOT NULL CHECK (length(trim(recommendation_reason)) > 0),
                rating REAL,
                services TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Newest-first listing
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_business_recommendations_created_at
            ON business_recommendations (created_at DESC)
            "#,
        )
        .execute(pool)
        .await?;

        // Settings table, one row per key
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_settings (
                key_name TEXT PRIMARY KEY,
                key_value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    tracing::error!("Database error: {}", e);
    StoreError::infrastructure(e)
}

#[async_trait]
impl RecommendationRepository for Database {
    async fn insert_recommendation(
        &self,
        new: &NewRecommendation,
    ) -> dental_core::Result<RecommendationRecord> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO business_recommendations
                (business_name, address, website_url, telephone, recommendation_reason,
                 rating, services, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING {}
            "#,
            RECOMMENDATION_COLUMNS
        );

        let row: RecommendationRow = sqlx::query_as(&sql)
            .bind(&new.business_name)
            .bind(&new.address)
            .bind(&new.website_url)
            .bind(&new.telephone)
            .bind(&new.recommendation_reason)
            .bind(new.rating)
            .bind(serde_json::to_string(&new.services)?)
            .bind(now)
            .bind(now)
            .fetch_one(&*self.pool)
            .await
            .map_err(db_err)?;

        row.try_into()
    }

    async fn get_recommendation(&self, id: i64) -> dental_core::Result<Option<RecommendationRecord>> {
        let sql = format!(
            "SELECT {} FROM business_recommendations WHERE id = ?1",
            RECOMMENDATION_COLUMNS
        );
        let row: Option<RecommendationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_err)?;

        row.map(RecommendationRecord::try_from).transpose()
    }

    async fn update_recommendation(
        &self,
        id: i64,
        patch: &RecommendationPatch,
    ) -> dental_core::Result<Option<RecommendationRecord>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE business_recommendations SET ");
        {
            let mut set = qb.separated(", ");
            for (field, value) in patch.assignments() {
                set.push(field.column())
                    .push_unseparated(" = ")
                    .push_bind_unseparated(value.to_string());
            }
            set.push("updated_at = ").push_bind_unseparated(Utc::now());
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(RECOMMENDATION_COLUMNS);

        let row: Option<RecommendationRow> = qb
            .build_query_as::<RecommendationRow>()
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_err)?;

        row.map(RecommendationRecord::try_from).transpose()
    }

    async fn list_recommendations(&self) -> dental_core::Result<Vec<RecommendationRecord>> {
        let sql = format!(
            "SELECT {} FROM business_recommendations ORDER BY created_at DESC, id DESC",
            RECOMMENDATION_COLUMNS
        );
        let rows: Vec<RecommendationRow> = sqlx::query_as(&sql)
            .fetch_all(&*self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(RecommendationRecord::try_from).collect()
    }

    async fn delete_recommendation(
        &self,
        id: i64,
    ) -> dental_core::Result<Option<RecommendationRecord>> {
        let sql = format!(
            "DELETE FROM business_recommendations WHERE id = ?1 RETURNING {}",
            RECOMMENDATION_COLUMNS
        );
        let row: Option<RecommendationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&*self.pool)
            .await
            .map_err(db_err)?;

        row.map(RecommendationRecord::try_from).transpose()
    }
}

#[async_trait]
impl SettingsRepository for Database {
    async fn get_settings(&self, keys: &[SettingKey]) -> dental_core::Result<Vec<SettingsEntry>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT key_name, key_value, updated_at FROM api_settings WHERE key_name IN (",
        );
        {
            let mut names = qb.separated(", ");
            for key in keys {
                names.push_bind(key.as_str());
            }
        }
        qb.push(")");

        let rows: Vec<SettingsRow> = qb
            .build_query_as::<SettingsRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(db_err)?;

        rows.into_iter().map(SettingsEntry::try_from).collect()
    }

    async fn upsert_settings(&self, values: &SettingValues) -> dental_core::Result<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for (key, value) in values {
            sqlx::query(
                r#"
                INSERT INTO api_settings (key_name, key_value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT (key_name)
                DO UPDATE SET key_value = excluded.key_value, updated_at = excluded.updated_at
                "#,
            )
            .bind(key.as_str())
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        // Dropping `tx` on an early return rolls every key back
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct RecommendationRow {
    id: i64,
    business_name: String,
    address: String,
    website_url: Option<String>,
    telephone: Option<String>,
    recommendation_reason: String,
    rating: Option<f64>,
    services: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RecommendationRow> for RecommendationRecord {
    type Error = StoreError;

    fn try_from(r: RecommendationRow) -> Result<Self, Self::Error> {
        Ok(RecommendationRecord {
            id: r.id,
            business_name: r.business_name,
            address: r.address,
            website_url: r.website_url,
            telephone: r.telephone,
            recommendation_reason: r.recommendation_reason,
            rating: r.rating,
            services: serde_json::from_str(&r.services)?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    key_name: String,
    key_value: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SettingsRow> for SettingsEntry {
    type Error = StoreError;

    fn try_from(r: SettingsRow) -> Result<Self, Self::Error> {
        Ok(SettingsEntry {
            key_name: r.key_name.parse().map_err(StoreError::infrastructure)?,
            key_value: r.key_value,
            updated_at: r.updated_at,
        })
    }
}
