//! HTTP API surface
//!
//! Two groups of routes:
//!
//! - `/api/cron/update-products` — the scheduled ingestion trigger
//!   ([`trigger`]), authenticated with a shared bearer secret.
//! - `/api/v1/*` — read-only catalog queries ([`catalog`]) and the
//!   ingestion-run audit listing, consumed by the game frontend.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{audit, AppState, ServerResult};

pub mod catalog;
pub mod trigger;

/// Build the `/api` router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cron/update-products", get(trigger::update_products))
        .route("/v1/products", get(get_products))
        .route("/v1/categories", get(get_categories))
        .route("/v1/bottle-sizes", get(get_bottle_sizes))
        .route("/v1/runs", get(get_runs))
        .with_state(state)
}

/// List products matching the query filters
async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<catalog::ProductQuery>,
) -> ServerResult<Json<Value>> {
    let products = catalog::list_products(&state.db, &query).await?;
    Ok(Json(json!({ "data": products })))
}

/// List categories that currently have products
async fn get_categories(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let categories = catalog::list_categories(&state.db).await?;
    Ok(Json(json!({ "data": categories })))
}

/// List distinct bottle sizes
async fn get_bottle_sizes(State(state): State<AppState>) -> ServerResult<Json<Value>> {
    let sizes = catalog::list_bottle_sizes(&state.db).await?;
    Ok(Json(json!({ "data": sizes })))
}

#[derive(Debug, Deserialize)]
struct RunsQuery {
    limit: Option<i64>,
}

/// List recent ingestion runs, newest first
async fn get_runs(
    State(state): State<AppState>,
    Query(query): Query<RunsQuery>,
) -> ServerResult<Json<Value>> {
    let runs = audit::recent_runs(&state.db, query.limit).await?;
    Ok(Json(json!({ "data": runs })))
}
