mod money;
mod side;
mod symbol;

pub use money::{PRICE_DECIMALS, quote_to_price};
pub use side::Side;
pub use symbol::Symbol;

pub type PortfolioId = uuid::Uuid;
pub type TradeId = uuid::Uuid;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
