use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error returned by HTTP handlers; renders as `{"error": kind, "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("request body too large: {0}")]
    PayloadTooLarge(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(ServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Service(ServiceError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Service(ServiceError::StorageFull(_) | ServiceError::Storage(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Service(ServiceError::InvalidInput(_)) => "invalid_input",
            ApiError::Service(ServiceError::NotFound(_)) => "not_found",
            ApiError::Service(ServiceError::StorageFull(_)) => "storage_full",
            ApiError::Service(ServiceError::Storage(_)) => "storage_error",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Service(
                ServiceError::InvalidInput(m)
                | ServiceError::NotFound(m)
                | ServiceError::StorageFull(m)
                | ServiceError::Storage(m),
            ) => m.clone(),
            ApiError::PayloadTooLarge(m) => m.clone(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // 超出 body 限制保留 413，其余（格式错误、缺字段、Content-Type 不对）统一为 400
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(rejection.body_text());
        }
        ApiError::Service(ServiceError::InvalidInput(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Service(ServiceError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody { error: self.kind(), message: self.message() };
        if status.is_server_error() {
            error!(status = status.as_u16(), kind = body.error, error = %body.message, "request failed");
        } else {
            warn!(status = status.as_u16(), kind = body.error, error = %body.message, "request rejected");
        }
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST, "invalid_input"),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND, "not_found"),
            (ServiceError::StorageFull("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "storage_full"),
            (ServiceError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        ];
        for (err, status, kind) in cases {
            let api = ApiError::from(err);
            assert_eq!(api.status(), status);
            assert_eq!(api.kind(), kind);
            assert_eq!(api.into_response().status(), status);
        }
    }

    #[test]
    fn payload_too_large_is_413() {
        let api = ApiError::PayloadTooLarge("too big".into());
        assert_eq!(api.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
