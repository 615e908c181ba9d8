use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
    Database(db::DbError),
    Orchestrator(OrchestratorError),
    Briefing(briefing::BriefingError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg),
            AppError::Database(err) => {
                tracing::error!("Database error: {:?}", err);
                match err {
                    db::DbError::SuiteNotFound(id) => (
                        StatusCode::NOT_FOUND,
                        "not_found",
                        format!("Suite not found: {}", id),
                    ),
                    db::DbError::RunNotFound(id) => (
                        StatusCode::NOT_FOUND,
                        "not_found",
                        format!("Run not found: {}", id),
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "database_error",
                        "Database error occurred".to_string(),
                    ),
                }
            }
            AppError::Orchestrator(err) => match err {
                OrchestratorError::EmptySuite(_) | OrchestratorError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, "bad_request", err.to_string())
                }
                OrchestratorError::ArchivedSuite(_)
                | OrchestratorError::InvalidRunState { .. }
                | OrchestratorError::CannotAbort { .. } => {
                    (StatusCode::CONFLICT, "conflict", err.to_string())
                }
                OrchestratorError::SuiteNotFound(_) | OrchestratorError::RunNotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found", err.to_string())
                }
                OrchestratorError::Database(db_err) => {
                    return AppError::Database(db_err).into_response();
                }
            },
            AppError::Briefing(err) => {
                tracing::error!("Briefing error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "briefing_error",
                    err.to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<db::DbError> for AppError {
    fn from(err: db::DbError) -> Self {
        AppError::Database(err)
    }
}

impl From<OrchestratorError> for AppError {
    fn from(err: OrchestratorError) -> Self {
        AppError::Orchestrator(err)
    }
}

impl From<briefing::BriefingError> for AppError {
    fn from(err: briefing::BriefingError) -> Self {
        AppError::Briefing(err)
    }
}
