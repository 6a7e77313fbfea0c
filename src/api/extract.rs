//! Request extractors whose rejections answer with the API error body
//! instead of axum's plain-text defaults.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::api::error::ApiError;

/// `Json<T>` with an [`ApiError`] rejection.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Path<T>` with an [`ApiError`] rejection.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Deserialize an optional id sent either as a JSON number or as a numeric
/// string (`1` or `"1"`). A blank string counts as absent.
///
/// Use with `#[serde(default, deserialize_with = "optional_id")]`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid id: {text}")))
        }
    }
}
