use serde::de::DeserializeOwned;
use wisby_core::api::Message;

use crate::error::RpcError;

/// A decoded API response, keyed by status. Error statuses are values here,
/// not `Err`s: only a failed request or an undecodable success body is.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ok(T),
    Created(T),
    NoContent,
    Unauthorized(Message),
    NotFound(Message),
    Unprocessable(Message),
    ServerError(Message),
    Unexpected { status: u16, body: String },
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn from_parts(status: u16, body: &[u8]) -> Result<Self, RpcError> {
        let response = match status {
            200 => ApiResponse::Ok(serde_json::from_slice(body)?),
            201 => ApiResponse::Created(serde_json::from_slice(body)?),
            204 => ApiResponse::NoContent,
            401 | 404 | 422 | 500 => match serde_json::from_slice::<Message>(body) {
                Ok(message) => match status {
                    401 => ApiResponse::Unauthorized(message),
                    404 => ApiResponse::NotFound(message),
                    422 => ApiResponse::Unprocessable(message),
                    _ => ApiResponse::ServerError(message),
                },
                Err(_) => Self::unexpected(status, body),
            },
            _ => Self::unexpected(status, body),
        };
        Ok(response)
    }

    fn unexpected(status: u16, body: &[u8]) -> Self {
        ApiResponse::Unexpected {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Ok(_) => 200,
            ApiResponse::Created(_) => 201,
            ApiResponse::NoContent => 204,
            ApiResponse::Unauthorized(_) => 401,
            ApiResponse::NotFound(_) => 404,
            ApiResponse::Unprocessable(_) => 422,
            ApiResponse::ServerError(_) => 500,
            ApiResponse::Unexpected { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ApiResponse::Ok(_) | ApiResponse::Created(_) | ApiResponse::NoContent
        )
    }

    /// The body of a 200 or 201.
    pub fn data(self) -> Option<T> {
        match self {
            ApiResponse::Ok(data) | ApiResponse::Created(data) => Some(data),
            _ => None,
        }
    }

    /// The `{ message }` of an error status.
    pub fn message(&self) -> Option<&str> {
        match self {
            ApiResponse::Unauthorized(m)
            | ApiResponse::NotFound(m)
            | ApiResponse::Unprocessable(m)
            | ApiResponse::ServerError(m) => Some(&m.message),
            _ => None,
        }
    }
}
