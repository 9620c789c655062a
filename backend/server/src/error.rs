use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Error parsing form: {0}")]
    MalformedForm(String),

    #[error("HTTP method not supported: {0}")]
    MethodNotSupported(Method),

    #[error("Method not supported")]
    StreamMethodNotAllowed,

    #[error("Invalid {key} value: {reason}")]
    Config { key: String, reason: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedForm { .. } => StatusCode::BAD_REQUEST,
            AppError::StreamMethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::MethodNotSupported { .. }
            | AppError::Config { .. }
            | AppError::Template { .. }
            | AppError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, self.to_string()).into_response()
    }
}
