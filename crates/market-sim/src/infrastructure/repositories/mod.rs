mod in_memory_portfolio;
mod in_memory_ticker;

pub use in_memory_portfolio::{InMemoryPortfolioRepository, InMemoryPortfolioTransaction};
pub use in_memory_ticker::InMemoryTickerStore;
