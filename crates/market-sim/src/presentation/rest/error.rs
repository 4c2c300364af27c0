use crate::application::{ExecutionError, HistoryError};
use crate::presentation::rest::dto::ErrorResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Numeric codes carried in the `code` field of error bodies
pub mod codes {
    pub const INTERNAL: i32 = -1000;
    pub const ILLEGAL_PARAMETER: i32 = -1100;
    pub const BAD_SYMBOL: i32 = -1121;
    pub const ORDER_REJECTED: i32 = -2010;
    pub const NO_PORTFOLIO: i32 = -2015;
}

/// Error returned by every handler, rendered as `{"code", "msg"}`
#[derive(Debug, Error)]
#[error("{message} (code {code}, HTTP {status})")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
    pub status: StatusCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            status,
        }
    }

    /// Symbol in an order that is malformed or not listed
    pub fn invalid_symbol(symbol: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::BAD_SYMBOL,
            format!("Invalid symbol: {symbol}"),
        )
    }

    /// Symbol in a lookup path that is not listed
    pub fn unknown_symbol(symbol: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::BAD_SYMBOL,
            format!("Unknown symbol: {symbol}"),
        )
    }

    pub fn invalid_parameter(param: &str, reason: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::ILLEGAL_PARAMETER,
            format!("Illegal parameter '{param}': {reason}"),
        )
    }

    pub fn portfolio_not_found(user_id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::NO_PORTFOLIO,
            format!("No portfolio for user {user_id}"),
        )
    }

    pub fn order_rejected(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::ORDER_REJECTED, reason)
    }
}

impl From<ExecutionError> for ApiError {
    fn from(error: ExecutionError) -> Self {
        match &error {
            ExecutionError::UnknownSymbol(symbol) => ApiError::invalid_symbol(symbol),
            ExecutionError::InvalidQuantity => {
                ApiError::invalid_parameter("quantity", "must be a positive integer")
            }
            ExecutionError::InsufficientFunds { .. }
            | ExecutionError::NoPosition(_)
            | ExecutionError::InsufficientPosition { .. } => {
                ApiError::order_rejected(error.to_string())
            }
            // Integrity fault; the detail is logged by the engine
            ExecutionError::PortfolioNotFound(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "Order could not be executed",
            ),
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(error: HistoryError) -> Self {
        match &error {
            HistoryError::UnknownSymbol(symbol) => ApiError::unknown_symbol(symbol),
            HistoryError::TooManyDays { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                codes::ILLEGAL_PARAMETER,
                error.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.code, self.message));
        (self.status, body).into_response()
    }
}
