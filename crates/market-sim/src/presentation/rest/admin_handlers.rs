//! Admin/Bootstrap handlers
//!
//! Used by the login flow and by tests to open portfolios with the
//! configured starting cash.

use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::info;

use crate::application::GetPortfolioUseCase;
use crate::application::ports::PortfolioRepository;
use crate::domain::Clock;
use crate::presentation::rest::ApiError;
use crate::presentation::rest::dto::{OpenPortfolioRequest, PortfolioResponse};
use crate::presentation::rest::router::AppState;

/// POST /admin/portfolios
///
/// Idempotent: an existing portfolio is returned unchanged.
pub async fn open_portfolio<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<OpenPortfolioRequest>,
) -> Result<Json<PortfolioResponse>, ApiError> {
    let user_id = req.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::invalid_parameter("userId", "cannot be empty"));
    }

    let portfolio = state.portfolios.get_or_create(user_id).await;
    info!(user_id = %user_id, portfolio_id = %portfolio.id, "portfolio opened");

    let view = GetPortfolioUseCase::new(Arc::clone(&state.portfolios))
        .execute(user_id)
        .await;
    Ok(Json(view.map_or_else(|| portfolio.into(), Into::into)))
}
