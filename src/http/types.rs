use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::error::AppError;

/// Error body shared by every endpoint: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            AppError::Validation(_) => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Authentication | AppError::InvalidToken => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),*) => {$(
        impl From<$rejection> for ApiError {
            fn from(rejection: $rejection) -> Self { Self::new(rejection.status(), rejection.body_text()) }
        }
    )*};
}

from_rejection!(JsonRejection, PathRejection, QueryRejection);
