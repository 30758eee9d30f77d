use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;
use wisby_core::api::Message;
use wisby_core::error::ValidationError;

pub const UNAUTHORIZED: &str = "Unauthorized";
pub const NOT_FOUND: &str = "Not Found";

/// Every handler error. Renders as `{ "message": ... }` with the matching status.
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    NotFound(String),
    Unprocessable(String),
    InternalServerError(anyhow::Error),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound(NOT_FOUND.to_string())
    }

    pub fn invalid(err: ValidationError) -> Self {
        Self::Unprocessable(err.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED.to_string()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Unprocessable(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };
        (status, Json(Message::new(message))).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisby_core::CoreError;

    #[test]
    fn test_statuses() {
        assert_eq!(
            ApiError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found().into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::invalid(ValidationError::new("Required"))
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_core_errors_are_internal() {
        let err: ApiError = CoreError::Uninitialized("database").into();
        assert!(matches!(err, ApiError::InternalServerError(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
