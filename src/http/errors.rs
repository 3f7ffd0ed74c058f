use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::application::LedgerError;

/// Everything a handler can fail with.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("{message}")]
    BadRequest {
        code: &'static str,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Ledger(LedgerError::CustomerAlreadyExists(_)) => json_error(
                StatusCode::CONFLICT,
                "customer_exists",
                "Customer already exists",
            ),
            ApiError::Ledger(LedgerError::CustomerNotFound(_)) => json_error(
                StatusCode::NOT_FOUND,
                "customer_not_found",
                "Customer not found",
            ),
            ApiError::Ledger(LedgerError::InsufficientFunds { .. }) => json_error(
                StatusCode::UNPROCESSABLE_ENTITY,
                "insufficient_funds",
                "Insufficient funds",
            ),
            ApiError::Ledger(LedgerError::InvalidAmount(msg)) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_amount", msg)
            }
            ApiError::BadRequest { code, message } => {
                json_error(StatusCode::BAD_REQUEST, code, message)
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "request failed");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}
