//! Person endpoints.
//!
//! - `GET /api/pessoas`: list with company and check-in state
//! - `GET /api/pessoas/:id`: one person
//! - `GET /api/pessoas/documento/:documento`: check-in desk lookup
//! - `POST /api/pessoas`, `PUT /api/pessoas/:id`, `DELETE /api/pessoas/:id`

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::extract::{optional_id, ApiJson, ApiPath};
use crate::api::types::{ApiContext, MessageResponse};
use crate::db::repository;
use crate::models::{NewPerson, Person, PersonLookup, PersonView};

const PERSON_NOT_FOUND: &str = "Pessoa não encontrada";

#[derive(Deserialize)]
pub struct PersonPayload {
    pub nome: Option<String>,
    pub documento: Option<String>,
    pub setor: Option<String>,
    /// Sent as a number or a numeric string.
    #[serde(default, deserialize_with = "optional_id")]
    pub empresa_id: Option<i64>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(String::from)
}

impl PersonPayload {
    fn into_new_person(self) -> Result<NewPerson, ApiError> {
        match (
            non_blank(self.nome.as_deref()),
            non_blank(self.documento.as_deref()),
            self.empresa_id,
        ) {
            (Some(name), Some(document), Some(company_id)) => Ok(NewPerson {
                name,
                document,
                sector: non_blank(self.setor.as_deref()),
                company_id,
            }),
            _ => Err(ApiError::BadRequest(
                "Nome, documento e empresa são obrigatórios".into(),
            )),
        }
    }
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<PersonView>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::list_persons(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<PersonView>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::get_person(&conn, id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(PERSON_NOT_FOUND.into()))
}

/// `GET /api/pessoas/documento/:documento`: exact document match.
pub async fn by_document(
    State(ctx): State<ApiContext>,
    ApiPath(document): ApiPath<String>,
) -> Result<Json<PersonLookup>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::find_person_by_document(&conn, document.trim())?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(PERSON_NOT_FOUND.into()))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(payload): ApiJson<PersonPayload>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let new = payload.into_new_person()?;
    let conn = ctx.core.open_db()?;
    let person = repository::insert_person(&conn, &new)?;
    tracing::info!(id = person.id, empresa_id = person.empresa_id, "Person registered");
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn update(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(payload): ApiJson<PersonPayload>,
) -> Result<Json<Person>, ApiError> {
    let new = payload.into_new_person()?;
    let conn = ctx.core.open_db()?;
    Ok(Json(repository::update_person(&conn, id, &new)?))
}

pub async fn remove(
    State(ctx): State<ApiContext>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let conn = ctx.core.open_db()?;
    repository::delete_person(&conn, id)?;
    tracing::info!(id, "Person deleted");
    Ok(Json(MessageResponse::new("Pessoa deletada com sucesso")))
}
