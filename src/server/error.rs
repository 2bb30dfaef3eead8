use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Everything a handler can fail with.
///
/// Clients only ever see two shapes: a 404 for missing resources and a 422 for
/// anything else, the underlying reason is logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("no category with id {0}")]
    UnknownCategory(i64),
    #[error("no question with id {0}")]
    UnknownQuestion(i64),
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::NotFound => "Resource not found.!",
            _ => "Unprocessable",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(err) => tracing::error!("Store error: {err}"),
            ApiError::NotFound => tracing::debug!("{self}"),
            _ => tracing::warn!("Rejected request: {self}"),
        }
        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
        };
        (status, Json(body)).into_response()
    }
}
