//! Check-in endpoints.
//!
//! - `GET /api/checkins`: newest first
//! - `GET /api/checkins/:id`, `DELETE /api/checkins/:id`
//! - `GET /api/checkins/pessoa/:pessoa_id`
//! - `POST /api/checkins`: hand a wristband to a person
//! - `GET /api/checkins/stats/geral`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::{optional_id, ApiJson, ApiPath};
use crate::api::types::{ApiContext, MessageResponse};
use crate::db::repository;
use crate::models::{CheckinStats, CheckinView};

#[derive(Deserialize)]
pub struct CheckinPayload {
    /// Sent as a number or a numeric string.
    #[serde(default, deserialize_with = "optional_id")]
    pub pessoa_id: Option<i64>,
    pub pulseira: Option<String>,
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<CheckinView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::list_checkins(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<CheckinView>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::get_checkin(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Check-in não encontrado".into()))
}

pub async fn for_person(
    State(ctx): State<ApiContext>,
    ApiPath(person_id): ApiPath<i64>,
) -> Result<Json<Vec<CheckinView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::list_person_checkins(&conn, person_id)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(payload): ApiJson<CheckinPayload>,
) -> Result<(StatusCode, Json<CheckinView>), ApiError> {
    let wristband = payload.pulseira.as_deref().map(str::trim).filter(|w| !w.is_empty());
    let (Some(person_id), Some(wristband)) = (payload.pessoa_id, wristband) else {
        return Err(ApiError::BadRequest(
            "ID da pessoa e número da pulseira são obrigatórios".into(),
        ));
    };

    let conn = ctx.core.open_db()?;
    let checkin = repository::insert_checkin(&conn, person_id, wristband)?;
    tracing::info!(id = checkin.checkin.id, pessoa_id = person_id, "Check-in recorded");
    Ok((StatusCode::CREATED, Json(checkin)))
}

/// `DELETE /api/checkins/:id`: cancel a check-in.
pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::delete_checkin(&conn, id)?;
    tracing::info!(id, "Check-in cancelled");
    Ok(Json(MessageResponse::new("Check-in cancelado com sucesso")))
}

pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<CheckinStats>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::checkin_stats(&conn)?))
}
