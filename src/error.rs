use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use compute::error::ComputeError;
use thiserror::Error;
use tracing::error;

use crate::export::ExportError;
use crate::schemas::ErrorResponse;
use crate::source::SourceError;

/// Errors returned by the JSON API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Empty result set or unknown region
    #[error("Data tidak ditemukan.")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Table store error: {0}")]
    Source(#[from] SourceError),

    #[error("Computation error: {0}")]
    Compute(#[from] ComputeError),

    #[error("Export error: {0}")]
    Export(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Source(_) => StatusCode::BAD_GATEWAY,
            ApiError::Compute(_) | ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Source(_) => "SOURCE_ERROR",
            ApiError::Compute(_) => "COMPUTE_ERROR",
            ApiError::Export(_) => "EXPORT_ERROR",
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(error: ExportError) -> Self {
        ApiError::Export(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        });

        (status, body).into_response()
    }
}
