use crate::application::{FillStatus, OrderFill, PortfolioView};
use crate::domain::{Portfolio, PortfolioId, Position, Side, Symbol, Trade, TradeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceResponse {
    pub symbol: Symbol,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub days: Option<u32>,
}

/// Market order request
///
/// `quantity` is kept as raw JSON so that fractional or negative values get
/// a proper validation error rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: String,
    pub symbol: String,
    pub side: String,
    pub quantity: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub status: FillStatus,
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
}

impl From<OrderFill> for OrderResponse {
    fn from(fill: OrderFill) -> Self {
        OrderResponse {
            status: fill.status,
            trade_id: fill.trade_id,
            symbol: fill.symbol,
            side: fill.side,
            quantity: fill.quantity,
            price: fill.price,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPortfolioRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub id: PortfolioId,
    pub user_id: String,
    pub cash: Decimal,
    pub positions: Vec<Position>,
    /// Newest first
    pub recent_trades: Vec<Trade>,
}

impl From<PortfolioView> for PortfolioResponse {
    fn from(view: PortfolioView) -> Self {
        PortfolioResponse {
            id: view.portfolio.id,
            user_id: view.portfolio.user_id,
            cash: view.portfolio.cash,
            positions: view.positions,
            recent_trades: view.recent_trades,
        }
    }
}

impl From<Portfolio> for PortfolioResponse {
    fn from(portfolio: Portfolio) -> Self {
        PortfolioResponse {
            id: portfolio.id,
            user_id: portfolio.user_id,
            cash: portfolio.cash,
            positions: Vec::new(),
            recent_trades: Vec::new(),
        }
    }
}

/// Error response, `{"code": -1121, "msg": "..."}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: i32,
    pub msg: String,
}

impl ErrorResponse {
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        ErrorResponse {
            code,
            msg: msg.into(),
        }
    }
}
