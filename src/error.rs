//! Caller-visible outcomes: every response carries a status, and errors add a kind tag.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::repo::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Activation code is invalid")]
    InvalidActivationCode,

    #[error("Activation code does not grant activation")]
    ActivationNotGranted,

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Server { message: String, kind: String },
}

impl ApiError {
    pub fn server(kind: impl Into<String>, message: impl ToString) -> Self {
        ApiError::Server {
            message: message.to_string(),
            kind: kind.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidActivationCode
            | ApiError::ActivationNotGranted => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Server { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidActivationCode | ApiError::ActivationNotGranted => "BAD_REQUEST",
            ApiError::NotFound(_) => "NO_RECORD",
            ApiError::Server { kind, .. } => kind,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::server(e.kind(), &e)
    }
}

/// Unreadable bodies (bad JSON, missing fields, wrong content type) are validation failures.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub kind: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            status: status.as_u16(),
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Success acknowledgment returned by both user operations.
#[derive(Debug, Serialize)]
pub struct Success {
    pub status: u16,
    pub message: String,
}

impl Success {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for Success {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
