use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::pagination::PageQuery;

/// JSON request body; an absent or malformed body is a validation error.
///
/// Unlike `axum::Json` no `Content-Type` header is required.
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|err| ApiError::InvalidBody(err.body_text()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ApiError::InvalidBody("request body is empty".to_owned()));
        }
        serde_json::from_slice(&body)
            .map(Payload)
            .map_err(|err| ApiError::InvalidBody(err.to_string()))
    }
}

/// Numeric id path segment. Anything else does not name a resource.
pub struct Id(pub i64);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound)?;
        Ok(Id(id))
    }
}

/// `?page=N` that never rejects: the first `page` value is used, a missing,
/// malformed or undecodable query string means the first page.
pub struct Page(pub PageQuery);

impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map(|Query(params)| params)
            .unwrap_or_default();
        let page = params
            .iter()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| PageQuery::parse(value))
            .unwrap_or_default();
        Ok(Page(page))
    }
}
