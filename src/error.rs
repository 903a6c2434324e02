use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::MediaType;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Token é obrigatório no header")]
    MissingToken,

    #[error("Campo '{0}' é obrigatório")]
    MissingField(&'static str),

    #[error("Campo 'file' é obrigatório (URL ou base64)")]
    MissingFile,

    #[error(
        "Tipo de mídia '{0}' não suportado. Tipos suportados: {}",
        MediaType::supported_list()
    )]
    UnsupportedMediaType(String),

    #[error("Corpo da requisição excede o limite de {max_size} bytes")]
    PayloadTooLarge { max_size: usize },

    #[error("{0}")]
    InvalidBody(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    InvalidUpstreamResponse(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken
            | AppError::MissingField(_)
            | AppError::MissingFile
            | AppError::UnsupportedMediaType(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidBody(_)
            | AppError::Upstream(_)
            | AppError::InvalidUpstreamResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = if status.is_client_error() {
            tracing::warn!("Rejected request: {}", message);
            json!({ "error": message })
        } else {
            tracing::error!("Failed to process media request: {}", message);
            // `details` mirrors `error` for existing clients
            json!({
                "error": message,
                "details": message
            })
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidBody(err.to_string())
    }
}
