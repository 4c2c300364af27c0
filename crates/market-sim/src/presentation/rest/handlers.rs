use axum::{
    Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use crate::application::ports::{NewsItem, PriceOracle, ResearchFeed, StrikeRow};
use crate::application::{
    GetHistoryUseCase, GetPortfolioUseCase, SubmitOrderCommand, SubmitOrderUseCase,
};
use crate::domain::{Clock, DailyBar, Side, Symbol, Ticker};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/tickers
pub async fn list_tickers<C: Clock>(State(state): State<Arc<AppState<C>>>) -> Json<Vec<Ticker>> {
    Json(state.tickers.all())
}

/// GET /api/price/{symbol}
pub async fn get_price<C: Clock>(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<PriceResponse>, ApiError> {
    let symbol = tracked_symbol(&state, &symbol)?;
    let price = state
        .tickers
        .current_price(&symbol)
        .ok_or_else(|| ApiError::unknown_symbol(symbol.as_str()))?;

    Ok(Json(PriceResponse { symbol, price }))
}

/// GET /api/history/{symbol}?days=N
pub async fn get_history<C: Clock>(
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<Vec<DailyBar>>, ApiError> {
    let use_case = GetHistoryUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.tickers),
        state.history,
    );

    let bars = use_case.execute(&symbol, query.days)?;
    Ok(Json(bars))
}

/// GET /api/news/{symbol}
pub async fn get_news<C: Clock>(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<Vec<NewsItem>>, ApiError> {
    let symbol = tracked_symbol(&state, &symbol)?;
    Ok(Json(state.research.news(&symbol, state.clock.now())))
}

/// GET /api/options/{symbol}
pub async fn get_options<C: Clock>(
    Path(symbol): Path<String>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<Vec<StrikeRow>>, ApiError> {
    let symbol = tracked_symbol(&state, &symbol)?;
    let spot = state
        .tickers
        .current_price(&symbol)
        .ok_or_else(|| ApiError::unknown_symbol(symbol.as_str()))?;

    Ok(Json(state.research.options_chain(&symbol, spot)))
}

/// POST /api/order
pub async fn submit_order<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let side: Side = req
        .side
        .as_str()
        .try_into()
        .map_err(|_| ApiError::invalid_parameter("side", "must be BUY or SELL"))?;

    let quantity = req
        .quantity
        .as_u64()
        .filter(|q| *q > 0)
        .ok_or_else(|| ApiError::invalid_parameter("quantity", "must be a positive integer"))?;

    let use_case = SubmitOrderUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.tickers),
        Arc::clone(&state.portfolios),
    );

    let fill = use_case
        .execute(SubmitOrderCommand {
            user_id: req.user_id,
            symbol: req.symbol,
            side,
            quantity,
        })
        .await?;

    Ok(Json(fill.into()))
}

/// GET /api/portfolio/{user_id}
pub async fn get_portfolio<C: Clock>(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let use_case = GetPortfolioUseCase::new(Arc::clone(&state.portfolios));

    use_case
        .execute(&user_id)
        .await
        .map(|view| Json(view.into()))
        .ok_or_else(|| ApiError::portfolio_not_found(&user_id))
}

/// Resolve a path symbol to a tracked instrument, 404 otherwise
fn tracked_symbol<C: Clock>(state: &AppState<C>, raw: &str) -> Result<Symbol, ApiError> {
    Symbol::new(raw)
        .ok()
        .filter(|symbol| state.tickers.get(symbol).is_some())
        .ok_or_else(|| ApiError::unknown_symbol(raw))
}
