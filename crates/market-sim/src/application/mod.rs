pub mod ports;
pub mod use_cases;

pub use ports::{
    MarketPublisher, PortfolioRepository, PortfolioTransaction, PortfolioView, PriceOracle,
    ResearchFeed,
};
pub use use_cases::{
    // Order execution
    ExecutionError,
    FillStatus,
    // Market data
    GetHistoryUseCase,
    GetPortfolioUseCase,
    HistoryError,
    HistoryLimits,
    OrderFill,
    SubmitOrderCommand,
    SubmitOrderUseCase,
};
