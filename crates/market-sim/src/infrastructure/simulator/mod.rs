mod price_simulator;

pub use price_simulator::{PriceSimulator, SimulatorHandle, TickReport};
