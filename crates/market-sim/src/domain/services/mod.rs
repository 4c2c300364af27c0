mod clock;
mod history;
mod random_walk;

pub use clock::Clock;
pub use history::{HISTORY_START_RATIO, synthesize_history};
pub use random_walk::{RandomWalk, TickError};
