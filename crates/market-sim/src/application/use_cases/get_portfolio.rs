use crate::application::ports::{PortfolioRepository, PortfolioView};
use std::sync::Arc;

/// How many ledger entries a portfolio read returns
pub const RECENT_TRADES_LIMIT: usize = 50;

pub struct GetPortfolioUseCase<R: PortfolioRepository> {
    portfolios: Arc<R>,
}

impl<R: PortfolioRepository> GetPortfolioUseCase<R> {
    pub fn new(portfolios: Arc<R>) -> Self {
        Self { portfolios }
    }

    /// Cash, open positions and the most recent trades, newest first
    pub async fn execute(&self, user_id: &str) -> Option<PortfolioView> {
        self.portfolios.view(user_id, RECENT_TRADES_LIMIT).await
    }
}
