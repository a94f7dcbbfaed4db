use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Validation(String),
    /// Reported as 422, not 404, for compatibility with existing clients.
    #[error("question {0} does not exist")]
    QuestionMissing(i64),
    #[error("failed to {operation}")]
    Operation {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// For `map_err` on queries issued by mutating handlers.
    pub fn operation(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Operation { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_)
            | ApiError::QuestionMissing(_)
            | ApiError::Operation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: u16,
    message: &'static str,
}

fn message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::UNPROCESSABLE_ENTITY => "Unprocessable entity",
        _ => "Internal server error",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Operation { source, .. } => {
                tracing::error!(error = %self, cause = %source, "Request failed")
            }
            ApiError::Database(_) => tracing::error!(error = %self, "Request failed"),
            _ => tracing::info!(error = %self, status = status.as_u16(), "Request rejected"),
        }
        let body = ErrorEnvelope {
            success: false,
            error: status.as_u16(),
            message: message(status),
        };
        (status, Json(body)).into_response()
    }
}
