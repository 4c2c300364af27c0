pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;

// Re-export entity types
pub use entities::{
    Currency, DailyBar, InstrumentSpec, Portfolio, Position, PositionOverflow, Region, TickUpdate,
    Ticker, Trade,
};

// Re-export events
pub use events::{MarketMessage, MessageKind};

// Re-export services
pub use services::{Clock, HISTORY_START_RATIO, RandomWalk, TickError, synthesize_history};

// Re-export value objects
pub use value_objects::{
    PRICE_DECIMALS, PortfolioId, Side, Symbol, Timestamp, TradeId, quote_to_price,
};
