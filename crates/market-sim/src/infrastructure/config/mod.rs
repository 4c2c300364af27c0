//! Configuration loading for the market simulator
//!
//! A JSON file provides:
//! - Server settings (bind address, stream buffer)
//! - Random walk parameters and tick cadence
//! - The instrument universe
//! - Portfolio endowment and accounts opened at boot
//! - History window limits
//!
//! Every field has a default, so `{}` is a complete configuration.

use crate::application::HistoryLimits;
use crate::domain::{InstrumentSpec, RandomWalk};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Root configuration for the market simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Instruments to simulate, in listing order
    #[serde(default = "InstrumentSpec::default_universe")]
    pub instruments: Vec<InstrumentSpec>,

    #[serde(default)]
    pub portfolios: PortfolioConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            instruments: InstrumentSpec::default_universe(),
            portfolios: PortfolioConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

impl MarketConfig {
    /// Load and validate configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Override the bind address from `HOST` / `PORT` style variables.
    ///
    /// `lookup` is `std::env::var(..).ok()` in the binary.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: {port}")))?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.instruments.is_empty() {
            return Err(ConfigError::Invalid("no instruments configured".into()));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if !seen.insert(&instrument.symbol) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate instrument {}",
                    instrument.symbol
                )));
            }
            if !instrument.price.is_finite() || instrument.price <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "instrument {} must have a positive price, got {}",
                    instrument.symbol, instrument.price
                )));
            }
        }

        let sim = &self.simulation;
        if !sim.volatility.is_finite() || sim.volatility < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "volatility must be finite and non-negative, got {}",
                sim.volatility
            )));
        }
        if !sim.price_floor.is_finite() || sim.price_floor <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "price_floor must be positive, got {}",
                sim.price_floor
            )));
        }
        if sim.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.server.stream_capacity == 0 {
            return Err(ConfigError::Invalid("stream_capacity must be positive".into()));
        }
        if self.portfolios.starting_cash < Decimal::ZERO {
            return Err(ConfigError::Invalid("starting_cash cannot be negative".into()));
        }
        if self.history.default_days > self.history.max_days {
            return Err(ConfigError::Invalid(format!(
                "history default_days {} exceeds max_days {}",
                self.history.default_days, self.history.max_days
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Generations buffered per stream subscriber before it skips ahead
    #[serde(default = "default_stream_capacity")]
    pub stream_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_stream_capacity() -> usize {
    16
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            stream_capacity: default_stream_capacity(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    #[serde(default = "default_price_floor")]
    pub price_floor: f64,
    #[serde(default = "default_max_volume_step")]
    pub max_volume_step: u64,
    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_volatility() -> f64 {
    RandomWalk::default().volatility
}

fn default_price_floor() -> f64 {
    RandomWalk::default().price_floor
}

fn default_max_volume_step() -> u64 {
    RandomWalk::default().max_volume_step
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            volatility: default_volatility(),
            price_floor: default_price_floor(),
            max_volume_step: default_max_volume_step(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn random_walk(&self) -> RandomWalk {
        RandomWalk {
            volatility: self.volatility,
            price_floor: self.price_floor,
            max_volume_step: self.max_volume_step,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Cash endowment of every new portfolio
    #[serde(default = "default_starting_cash")]
    pub starting_cash: Decimal,
    /// User ids whose portfolios are opened at boot
    #[serde(default)]
    pub accounts: Vec<String>,
}

fn default_starting_cash() -> Decimal {
    Decimal::from(100_000)
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            accounts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_days")]
    pub default_days: u32,
    #[serde(default = "default_max_history_days")]
    pub max_days: u32,
}

fn default_history_days() -> u32 {
    HistoryLimits::default().default_days
}

fn default_max_history_days() -> u32 {
    HistoryLimits::default().max_days
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_days: default_history_days(),
            max_days: default_max_history_days(),
        }
    }
}

impl HistoryConfig {
    pub fn limits(&self) -> HistoryLimits {
        HistoryLimits {
            default_days: self.default_days,
            max_days: self.max_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
