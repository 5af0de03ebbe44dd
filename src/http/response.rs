//! Error responses of the analytics endpoint.
//!
//! Client errors use `{ success: false, message }`; the server error uses
//! `{ error }`. Callers never see which backend read failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Request is missing required fields")]
    MissingFields,
    #[error("Unauthenticated user")]
    Unauthenticated,
    #[error("Something went wrong")]
    Internal,
}

#[derive(Serialize)]
struct FailureBody {
    success: bool,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MissingFields | ApiError::Unauthenticated => {
                let body = FailureBody {
                    success: false,
                    message: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
            ApiError::Internal => {
                let body = ErrorBody {
                    error: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
