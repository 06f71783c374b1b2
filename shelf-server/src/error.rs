//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shelf_core::InventoryError;

/// Error returned by request handlers
#[derive(Debug)]
pub enum ApiError {
    /// The inventory refused the operation
    Inventory(InventoryError),

    /// The request itself was malformed
    BadRequest(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        ApiError::Inventory(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Inventory(err) => match err {
                InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
                InventoryError::DuplicateId(_) => StatusCode::CONFLICT,
                InventoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                InventoryError::Unavailable(_) => StatusCode::BAD_REQUEST,
                InventoryError::CapacityExceeded(_) => StatusCode::CONFLICT,
                InventoryError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Inventory(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.message());
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", self.message());
        }

        (
            status,
            Json(ErrorResponse {
                message: self.message(),
            }),
        )
            .into_response()
    }
}
