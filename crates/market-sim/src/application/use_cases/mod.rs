mod get_history;
mod get_portfolio;
mod submit_order;

pub use get_history::{GetHistoryUseCase, HistoryError, HistoryLimits};
pub use get_portfolio::{GetPortfolioUseCase, RECENT_TRADES_LIMIT};
pub use submit_order::{
    ExecutionError, FillStatus, OrderFill, SubmitOrderCommand, SubmitOrderUseCase,
};
