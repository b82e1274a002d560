use academy_core::error::{AccessCodeRejection, CoreError};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the JSON error body
/// `{ "success": false, "code", "message" }`, plus `"decision"` for access
/// denials.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `academy_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

/// Well-formed JSON of the wrong shape is a validation error; anything
/// else wrong with the body is a bad request.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => {
                AppError::Core(CoreError::Validation(err.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

const SERVER_ERROR_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut decision = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    not_found_code(entity),
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::CourseNotFound(slug) => (
                    StatusCode::NOT_FOUND,
                    "COURSE_NOT_FOUND",
                    format!("Course '{slug}' not found"),
                ),
                CoreError::AccessDenied(denial) => {
                    decision = Some(denial.code());
                    (
                        StatusCode::FORBIDDEN,
                        denial.code(),
                        denial.message().to_string(),
                    )
                }
                CoreError::AccessCodeRejected(rejection) => {
                    let status = match rejection {
                        AccessCodeRejection::Exhausted => StatusCode::CONFLICT,
                        AccessCodeRejection::Invalid | AccessCodeRejection::Expired => {
                            StatusCode::BAD_REQUEST
                        }
                    };
                    (status, rejection.code(), rejection.message().to_string())
                }
                CoreError::CourseStructure(msg) => {
                    tracing::error!(error = %msg, "Course structure error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "COURSE_STRUCTURE_ERROR",
                        "Course content is misconfigured".to_string(),
                    )
                }
                CoreError::QuizNotConfigured { subsection_id } => {
                    tracing::error!(subsection_id, "Quiz required but no questions authored");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "QUIZ_NOT_CONFIGURED",
                        "The quiz for this lesson is not configured".to_string(),
                    )
                }
                CoreError::QuizNotRequired { .. } => (
                    StatusCode::BAD_REQUEST,
                    "QUIZ_NOT_REQUIRED",
                    "This lesson has no quiz".to_string(),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    server_error()
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let mut body = json!({
            "success": false,
            "code": code,
            "message": message,
        });
        if let Some(decision) = decision {
            body["decision"] = json!(decision);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn not_found_code(entity: &str) -> &'static str {
    match entity {
        "Course" => "COURSE_NOT_FOUND",
        "Section" => "SECTION_NOT_FOUND",
        "Subsection" => "SUBSECTION_NOT_FOUND",
        _ => "NOT_FOUND",
    }
}

fn server_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "SERVER_ERROR",
        SERVER_ERROR_MESSAGE.to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            server_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            server_error()
        }
    }
}
