use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// The one message ever returned for a failed login. Wrong password and
/// malformed payload are deliberately indistinguishable so the endpoint leaks
/// no validity signal.
pub const ACCESS_DENIED: &str = "ACCESS DENIED: Invalid credentials.";

/// AppError
///
/// Request-level error taxonomy. Every fallible handler returns this, and the
/// `IntoResponse` impl below is the single place where errors are mapped to
/// HTTP statuses:
///
/// - `Validation` is the only variant that carries a user-facing message.
/// - `NotFound` is generic on purpose: the public path must not distinguish
///   "no such post" from "exists but unpublished".
/// - `AccessDenied` always carries the same constant message.
/// - `Database` propagates as a fatal error for the single request. The cause
///   is logged server-side but never shown to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("ACCESS DENIED: Invalid credentials.")]
    AccessDenied,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Whether a store error is a foreign-key violation, i.e. the referenced row
/// does not exist. The comment path relies on this instead of a separate
/// existence check, so there is no window between checking and inserting.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation)
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            AppError::AccessDenied => (StatusCode::UNAUTHORIZED, ACCESS_DENIED.to_string()),
            AppError::Database(e) => {
                // Log the underlying failure for debugging but return a generic
                // internal error; the caller may simply resubmit.
                tracing::error!("store failure: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
