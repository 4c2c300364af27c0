use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{admin_handlers, handlers};
use crate::application::HistoryLimits;
use crate::domain::Clock;
use crate::infrastructure::{
    BroadcastMarketPublisher, InMemoryPortfolioRepository, InMemoryTickerStore,
    SyntheticResearchFeed,
};

/// Application state shared across handlers - uses concrete infrastructure types
pub struct AppState<C: Clock> {
    pub clock: Arc<C>,
    pub tickers: Arc<InMemoryTickerStore>,
    pub portfolios: Arc<InMemoryPortfolioRepository>,
    pub publisher: Arc<BroadcastMarketPublisher>,
    pub research: Arc<SyntheticResearchFeed>,
    pub history: HistoryLimits,
}

impl<C: Clock> AppState<C> {
    pub fn new(
        clock: Arc<C>,
        tickers: Arc<InMemoryTickerStore>,
        portfolios: Arc<InMemoryPortfolioRepository>,
        publisher: Arc<BroadcastMarketPublisher>,
        research: Arc<SyntheticResearchFeed>,
        history: HistoryLimits,
    ) -> Self {
        AppState {
            clock,
            tickers,
            portfolios,
            publisher,
            research,
            history,
        }
    }
}

/// Create the REST API router
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Market data
        .route("/api/tickers", get(handlers::list_tickers::<C>))
        .route("/api/price/{symbol}", get(handlers::get_price::<C>))
        .route("/api/history/{symbol}", get(handlers::get_history::<C>))
        .route("/api/news/{symbol}", get(handlers::get_news::<C>))
        .route("/api/options/{symbol}", get(handlers::get_options::<C>))
        // Trading
        .route("/api/order", post(handlers::submit_order::<C>))
        .route("/api/portfolio/{user_id}", get(handlers::get_portfolio::<C>))
        // Admin/Bootstrap
        .route("/admin/portfolios", post(admin_handlers::open_portfolio::<C>))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
