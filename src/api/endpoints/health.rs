//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub ocr: bool,
    pub version: &'static str,
}

/// `GET /api/health`: liveness plus database reachability.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let database = match ctx.core.open_db().map_err(ApiError::from).and_then(|conn| {
        db::ping(&conn).map_err(ApiError::from)
    }) {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            "unavailable"
        }
    };

    Ok(Json(HealthResponse {
        status: "ok",
        database,
        ocr: ctx.core.ocr_engine().is_ok(),
        version: crate::config::APP_VERSION,
    }))
}
