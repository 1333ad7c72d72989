use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Handler-boundary errors. The `Display` text is the `msg` clients see.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid Content-Type. Expected application/json.")]
    InvalidContentType,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{label} with the same {field} already exists")]
    Duplicate {
        label: &'static str,
        field: &'static str,
    },

    #[error("No {plural} found")]
    NoneFound { plural: &'static str },

    #[error("No {singular} with the id: {id} found")]
    NotFound { singular: &'static str, id: String },

    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidContentType
            | ApiError::InvalidBody(_)
            | ApiError::Duplicate { .. } => StatusCode::BAD_REQUEST,
            ApiError::NoneFound { .. } | ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
