use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

pub const INTERNAL_SERVER_ERROR: &str = "internal server error";

/// Failures a request can end in. Only validation and not-found messages
/// are shown to the client; everything else becomes a generic 500.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("store error: {0}")]
    Store(#[from] diesel::result::Error),

    #[error("store connection error: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn task_not_found(id: i32) -> Self {
        ApiError::NotFound(format!("task {} not found", id))
    }
}

impl From<BlockingError> for ApiError {
    fn from(err: BlockingError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Store(_) | ApiError::Connection(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            ApiError::Validation(message) | ApiError::NotFound(message) => message.clone(),
            ApiError::MethodNotAllowed => self.to_string(),
            _ => {
                tracing::error!(error = %self, "request failed");
                INTERNAL_SERVER_ERROR.to_string()
            }
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_store_errors_do_not_leak_details() {
        let query_error = diesel::result::Error::QueryBuilderError("SELECT * FROM tasks".into());
        let err = ApiError::Store(query_error);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_SERVER_ERROR }));
    }

    #[actix_web::test]
    async fn test_validation_message_is_surfaced_verbatim() {
        let err = ApiError::Validation("title is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "title is required");
    }

    #[test]
    fn test_method_not_allowed_status() {
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(ApiError::task_not_found(7).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::task_not_found(7).to_string(), "task 7 not found");
    }
}
