//! Central error type for the API surface

use crate::portfolio::PortfolioError;
use crate::rate_limit::RateLimitError;
use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        ApiError::RateLimitExceeded(err.to_string())
    }
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::RateLimitExceeded(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg, "RATE_LIMIT_EXCEEDED")
            }
            ApiError::Internal(err) => {
                // Details go to the log, not the client
                tracing::error!(error = %err, "Internal error handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_conversion() {
        let err: ApiError = RateLimitError {
            max_requests: 5,
            window_secs: 10,
        }
        .into();
        assert!(matches!(err, ApiError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_portfolio_error_is_bad_request() {
        let err: ApiError = PortfolioError::InsufficientFunds {
            required: rust_decimal::Decimal::new(100, 0),
            available: rust_decimal::Decimal::ZERO,
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
