mod market_publisher;
mod portfolio_repository;
mod price_oracle;
mod research_feed;

pub use market_publisher::MarketPublisher;
pub use portfolio_repository::{PortfolioRepository, PortfolioTransaction, PortfolioView};
pub use price_oracle::PriceOracle;
pub use research_feed::{NewsItem, OptionQuote, ResearchFeed, Sentiment, StrikeRow};
