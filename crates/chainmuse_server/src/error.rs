//! Mapping of failures onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chainmuse_error::{
    ContentError, ContentErrorKind, FailureKind, LedgerError, PipelineError,
};
use serde_json::json;
use tracing::error;

/// Failure of an API call.
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    /// Missing or malformed input
    #[display("{}", _0)]
    BadRequest(String),
    /// A create call stopped at some pipeline stage
    #[display("{}: {}", context, source)]
    Pipeline {
        /// What the caller asked for
        context: &'static str,
        /// Stage and cause
        source: PipelineError,
    },
    /// A ledger query failed
    #[display("{}: {}", context, source)]
    Ledger {
        /// What the caller asked for
        context: &'static str,
        /// Underlying error
        source: LedgerError,
    },
    /// Content could not be read
    #[display("{}: {}", context, source)]
    Content {
        /// What the caller asked for
        context: &'static str,
        /// Underlying error
        source: ContentError,
    },
}

impl ApiError {
    /// HTTP status for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline { source, .. } if source.failure() == FailureKind::InvalidParent => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Content { source, .. }
                if matches!(source.kind, ContentErrorKind::ContentUnavailable { .. }) =>
            {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(message) => json!({ "error": message }),
            ApiError::Pipeline { context, source } => {
                error!(%status, stage = %source.stage(), kind = %source.failure(), "{}", context);
                let mut body = json!({
                    "error": context,
                    "stage": source.stage().to_string(),
                    "kind": source.failure().to_string(),
                    "details": source.cause().to_string(),
                });
                if let Some(orphan) = source.orphaned_content() {
                    body["orphanedContent"] = json!(orphan);
                }
                body
            }
            ApiError::Ledger { context, source } => {
                error!(%status, error = %source, "{}", context);
                json!({ "error": context, "details": source.kind.to_string() })
            }
            ApiError::Content { context, source } => {
                error!(%status, error = %source, "{}", context);
                json!({ "error": context, "details": source.kind.to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}
