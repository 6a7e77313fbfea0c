//! Company endpoints.
//!
//! - `GET /api/empresas`: list with person and check-in counts
//! - `GET /api/empresas/:id`: one company with counts
//! - `POST /api/empresas`: create
//! - `PUT /api/empresas/:id`: rename
//! - `DELETE /api/empresas/:id`: delete when no persons are registered

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::types::{ApiContext, MessageResponse};
use crate::db::repository;
use crate::models::{Company, CompanyOverview};

#[derive(Deserialize)]
pub struct CompanyPayload {
    pub nome: Option<String>,
}

impl CompanyPayload {
    fn name(&self) -> Result<&str, ApiError> {
        self.nome
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::BadRequest("Nome da empresa é obrigatório".into()))
    }
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<CompanyOverview>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::list_companies(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<CompanyOverview>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::get_company(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Empresa não encontrada".into()))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(payload): ApiJson<CompanyPayload>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    let name = payload.name()?;
    let conn = ctx.core.open_db()?;
    let company = repository::insert_company(&conn, name)?;
    tracing::info!(id = company.id, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<CompanyPayload>,
) -> Result<Json<Company>, ApiError> {
    let name = payload.name()?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::update_company(&conn, id, name)?))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::delete_company(&conn, id)?;
    tracing::info!(id, "Company deleted");
    Ok(Json(MessageResponse::new("Empresa deletada com sucesso")))
}
