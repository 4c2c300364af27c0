pub mod clock;
pub mod config;
pub mod event_publisher;
pub mod repositories;
pub mod research;
pub mod simulator;

pub use clock::SimulationClock;
pub use config::{
    ConfigError, HistoryConfig, MarketConfig, PortfolioConfig, ServerConfig, SimulationConfig,
};
pub use event_publisher::{BroadcastMarketPublisher, MarketSubscription};
pub use repositories::{
    InMemoryPortfolioRepository, InMemoryPortfolioTransaction, InMemoryTickerStore,
};
pub use research::SyntheticResearchFeed;
pub use simulator::{PriceSimulator, SimulatorHandle, TickReport};
