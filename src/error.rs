use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    NotFound(String),

    #[error("fewer than 3 developers qualify for {year} (found {found})")]
    InsufficientData { year: i64, found: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found", what))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InsufficientData { .. } => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Store(ref e) => {
                tracing::error!(error = %e, "Dataset failure while serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        assert_eq!(AppError::not_found("developer").to_string(), "developer not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::not_found("user"), StatusCode::NOT_FOUND),
            (AppError::InvalidInput("year".to_string()), StatusCode::BAD_REQUEST),
            (
                AppError::InsufficientData { year: 2010, found: 2 },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Store(StoreError::MissingColumn("price".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
