mod broadcast;

pub use broadcast::{BroadcastMarketPublisher, MarketSubscription};
