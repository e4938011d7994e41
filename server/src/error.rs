//! HTTP error type for the todo handlers.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use todo_core::{ErrorResponse, ValidationError};

use crate::store::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-supplied data failed a precondition. Nothing reached the store.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The store call failed. `context` says what the handler was doing.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Adapter for `map_err` that tags a store failure with what was being
    /// attempted.
    pub fn store(context: &'static str) -> impl FnOnce(StoreError) -> ApiError {
        move |source| ApiError::Store { context, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store {
                source: StoreError::NotFound(_),
                ..
            } => StatusCode::NOT_FOUND,
            ApiError::Store {
                source: StoreError::Timeout(_),
                ..
            } => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(ValidationError::MalformedBody(detail)) => ErrorResponse {
                message: "invalid JSON body".to_string(),
                error: Some(detail.clone()),
            },
            ApiError::Validation(err) => ErrorResponse {
                message: err.to_string(),
                error: None,
            },
            ApiError::Store {
                source: StoreError::NotFound(_),
                ..
            } => ErrorResponse {
                message: "todo not found".to_string(),
                error: Some(self.to_string()),
            },
            ApiError::Store { context, source } => ErrorResponse {
                message: context.to_string(),
                error: Some(source.to_string()),
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::from(ValidationError::EmptyTitle).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::store("failed to delete todo")(StoreError::NotFound(Uuid::nil())).status_code(),
            StatusCode::NOT_FOUND
        );
        let corrupt = StoreError::Corrupt {
            key: "demo_todo:todo:x".to_string(),
            reason: "missing field title".to_string(),
        };
        assert_eq!(
            ApiError::store("failed to fetch todos")(corrupt).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn timeout_is_a_gateway_timeout() {
        let err = ApiError::store("failed to fetch todos")(StoreError::Timeout(
            std::time::Duration::from_secs(1),
        ));
        assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
        let body = err.body();
        assert_eq!(body.message, "failed to fetch todos");
        assert_eq!(body.error.as_deref(), Some("document store did not answer within 1s"));
    }

    #[test]
    fn validation_body_carries_message_only() {
        let body = ApiError::from(ValidationError::EmptyTitle).body();
        assert_eq!(body.message, "the title is required");
        assert!(body.error.is_none());
    }

    #[test]
    fn malformed_body_echoes_parse_error() {
        let err = ApiError::from(ValidationError::MalformedBody("expected value at line 1".into()));
        let body = err.body();
        assert_eq!(body.message, "invalid JSON body");
        assert_eq!(body.error.as_deref(), Some("expected value at line 1"));
    }

    #[test]
    fn store_body_names_the_failed_action() {
        let corrupt = StoreError::Corrupt {
            key: "k".to_string(),
            reason: "bad".to_string(),
        };
        let body = ApiError::store("failed to save todo")(corrupt).body();
        assert_eq!(body.message, "failed to save todo");
        assert_eq!(body.error.as_deref(), Some("corrupt document k: bad"));
    }
}
