use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tradeoff_core::error::CoreError;
use tradeoff_db::store::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"error": "...", "code": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tradeoff_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure of the record store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            AppError::Store(err) => classify_store_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// Every store failure is a server-side outcome:
///
/// - Timeouts map to 504.
/// - Everything else, constraint violations included, maps to 500 with a
///   sanitized message. The operation name and detail only go to the log.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Constraint { operation, detail } => {
            tracing::error!(operation, detail = %detail, "Store constraint violated");
            internal()
        }
        StoreError::Timeout {
            operation,
            elapsed_ms,
        } => {
            tracing::error!(operation, elapsed_ms, "Store call timed out");
            (
                StatusCode::GATEWAY_TIMEOUT,
                "STORE_TIMEOUT",
                "The data store did not respond in time".to_string(),
            )
        }
        StoreError::Database { operation, source } => {
            tracing::error!(operation, error = %source, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (
                AppError::Core(CoreError::NotFound {
                    entity: "Project",
                    id: 4,
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::Core(CoreError::Validation("bad".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Core(CoreError::Unauthorized("no".into())),
                StatusCode::UNAUTHORIZED,
            ),
            (
                AppError::Core(CoreError::Forbidden("no".into())),
                StatusCode::FORBIDDEN,
            ),
            (
                AppError::Store(StoreError::Timeout {
                    operation: "list_scores",
                    elapsed_ms: 10,
                }),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                AppError::Store(StoreError::Constraint {
                    operation: "upsert_score",
                    detail: "fk".into(),
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn store_errors_never_produce_client_statuses() {
        let errors = [
            StoreError::Constraint {
                operation: "upsert_score",
                detail: "choice 7 does not exist".into(),
            },
            StoreError::Timeout {
                operation: "list_choices",
                elapsed_ms: 10_000,
            },
        ];

        for err in errors {
            let status = AppError::Store(err).into_response().status();
            assert!(status.is_server_error(), "{status}");
        }
    }
}
