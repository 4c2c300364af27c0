mod bar;
mod portfolio;
mod position;
mod ticker;
mod trade;

pub use bar::DailyBar;
pub use portfolio::Portfolio;
pub use position::{Position, PositionOverflow};
pub use ticker::{Currency, InstrumentSpec, Region, TickUpdate, Ticker};
pub use trade::Trade;
