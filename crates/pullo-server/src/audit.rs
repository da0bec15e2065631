//! Ingestion run audit trail
//!
//! Every pipeline execution appends exactly one row to `ingestion_runs`,
//! success or failure. Rows are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

/// Default number of run records returned per query
pub const DEFAULT_RUNS_QUERY_LIMIT: i64 = 20;

/// Maximum number of run records that can be returned in a single query
pub const MAX_RUNS_QUERY_LIMIT: i64 = 200;

/// One recorded ingestion run
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RunRecord {
    pub id: i32,
    /// Integration name (e.g., "Alko Products Update")
    pub integration: String,
    /// Human-readable outcome detail
    pub details: String,
    pub success: bool,
    /// Hostname the run was triggered from
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

/// Append one run record
pub async fn record_run(
    pool: &PgPool,
    integration: &str,
    details: &str,
    success: bool,
    domain: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ingestion_runs (integration, details, success, domain)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(integration)
    .bind(details)
    .bind(success)
    .bind(domain)
    .execute(pool)
    .await?;

    debug!(integration, success, "Recorded ingestion run");

    Ok(())
}

/// Fetch the most recent run records, newest first
pub async fn recent_runs(
    pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<RunRecord>, sqlx::Error> {
    let limit = limit
        .unwrap_or(DEFAULT_RUNS_QUERY_LIMIT)
        .clamp(1, MAX_RUNS_QUERY_LIMIT);

    sqlx::query_as::<_, RunRecord>(
        r#"
        SELECT id, integration, details, success, domain, created_at
        FROM ingestion_runs
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
