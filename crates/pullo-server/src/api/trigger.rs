//! Scheduled-update trigger endpoint
//!
//! `GET /api/cron/update-products` runs one ingestion pipeline pass. The
//! endpoint is meant for an external scheduler: it authenticates with a
//! shared bearer secret and responds 404 when no secret is configured at
//! all, so an unconfigured deployment exposes nothing.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use crate::ingest::alko::AlkoPipeline;
use crate::AppState;

/// Run the Alko catalog update once
pub async fn update_products(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(secret) = &state.config.trigger.cron_secret else {
        return StatusCode::NOT_FOUND.into_response();
    };

    if !is_authorized(&headers, secret) {
        warn!("Rejected catalog update trigger with missing or bad credentials");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    info!("Running scheduled catalog update");

    let domain = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let pipeline = AlkoPipeline::new(state.config.alko.clone(), state.db.clone());
    let outcome = pipeline.run(&domain).await;

    if outcome.success {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": format!(
                    "Successfully processed {} products",
                    outcome.products_processed
                ),
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
            .into_response()
    } else {
        // Production responses stay generic; the full detail is in the logs
        // and the audit row.
        let details = if state.config.trigger.production {
            "Check server logs for more details".to_string()
        } else {
            outcome.error.unwrap_or_else(|| "Unknown error".to_string())
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to process Alko data",
                "details": details,
            })),
        )
            .into_response()
    }
}

fn is_authorized(headers: &HeaderMap, secret: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value == format!("Bearer {}", secret))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_authorized_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer sekret".parse().unwrap());
        assert!(is_authorized(&headers, "sekret"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "sekret".parse().unwrap());
        assert!(!is_authorized(&headers, "sekret"));
    }

    #[test]
    fn test_is_authorized_rejects_missing_header() {
        assert!(!is_authorized(&HeaderMap::new(), "sekret"));
    }

    #[test]
    fn test_is_authorized_rejects_wrong_secret() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer arvaus".parse().unwrap());
        assert!(!is_authorized(&headers, "sekret"));
    }
}
