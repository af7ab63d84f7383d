//! Persistence sink for generated project plans.
//!
//! A plan is written at most once per request, and only when the caller had
//! a session and generation produced a schema-valid object. The row's `id`
//! is allocated by the request handler before generation starts, so the
//! identifier inside the generated content always matches the row.
//!
//! Table shape:
//!
//! ```sql
//! generated_project_plan (
//!     id                UUID PRIMARY KEY,
//!     user_id           TEXT NOT NULL,
//!     generated_content JSONB NOT NULL,
//!     project_idea      TEXT NOT NULL,
//!     created_at        TIMESTAMPTZ NOT NULL,
//!     updated_at        TIMESTAMPTZ NOT NULL
//! )
//! ```

#![deny(missing_docs)]

mod error;

use async_trait::async_trait;
use chrono::Utc;
use config::DatabaseConfig;
use secrecy::ExposeSecret;
use sqlx::{PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

pub use error::StorageError;

const INSERT_PLAN: &str = "INSERT INTO generated_project_plan \
     (id, user_id, generated_content, project_idea, created_at, updated_at) \
     VALUES ($1, $2, $3, $4, $5, $6)";

/// A plan ready to be persisted.
///
/// Timestamps are not part of the record; the store sets both `created_at`
/// and `updated_at` to the current time at insert.
#[derive(Debug, Clone)]
pub struct NewPlanRecord {
    /// Identifier allocated before generation started.
    pub id: Uuid,
    /// The user who owns the plan.
    pub user_id: String,
    /// The schema-valid generated object.
    pub generated_content: serde_json::Value,
    /// The idea text the plan was generated from.
    pub project_idea: String,
}

/// Durable store for generated plans.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Insert exactly one row for the given record.
    async fn insert_plan(&self, record: NewPlanRecord) -> Result<(), StorageError>;
}

/// Postgres-backed plan store.
///
/// The pool connects lazily, so the process starts without a reachable
/// database and connection problems surface per-query.
pub struct PostgresPlanStore {
    pool: PgPool,
}

impl PostgresPlanStore {
    /// Create a store from the database configuration.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let url = config.url.as_ref().ok_or(StorageError::NotConfigured)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(url.expose_secret())
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl PlanStore for PostgresPlanStore {
    async fn insert_plan(&self, record: NewPlanRecord) -> Result<(), StorageError> {
        let now = Utc::now();

        sqlx::query(INSERT_PLAN)
            .bind(record.id)
            .bind(&record.user_id)
            .bind(&record.generated_content)
            .bind(&record.project_idea)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Database insertion error: {e}");
                StorageError::Insert(e.to_string())
            })?;

        log::info!("Project plan saved to database with ID: {}", record.id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    #[test]
    fn insert_statement_covers_the_full_row() {
        assert_snapshot!(super::INSERT_PLAN, @"INSERT INTO generated_project_plan (id, user_id, generated_content, project_idea, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)");
    }
}
