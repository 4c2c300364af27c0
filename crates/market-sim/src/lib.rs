//! Market Simulator
//!
//! A simulated live market feed paired with a paper-trading execution
//! engine.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Core entities and rules (Ticker, Portfolio, Position, Trade, RandomWalk)
//! - **Application**: Use cases and port interfaces (SubmitOrder, GetPortfolio, GetHistory)
//! - **Infrastructure**: Implementations of ports (InMemoryTickerStore, PriceSimulator, etc.)
//! - **Presentation**: REST API and WebSocket handlers
//!
//! # Features
//!
//! - Bounded random walk over a configurable instrument universe
//! - WebSocket stream: one SNAPSHOT per connection, then an UPDATE per tick
//! - Market orders filled at the live price, atomically per portfolio
//! - Synthetic daily history, news and option chains for charting
//!
//! # Example
//!
//! ```ignore
//! use market_sim::{MarketConfig, MarketServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = MarketServer::from_config(MarketConfig::default()).await?;
//!     server.run().await
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{
    Clock, Currency, DailyBar, InstrumentSpec, MarketMessage, MessageKind, Portfolio, Position,
    RandomWalk, Region, Side, Symbol, Ticker, Timestamp, Trade, TradeId,
};

pub use infrastructure::{
    BroadcastMarketPublisher, ConfigError, InMemoryPortfolioRepository, InMemoryTickerStore,
    MarketConfig, MarketSubscription, PriceSimulator, SimulationClock, SimulatorHandle,
    SyntheticResearchFeed,
};

pub use application::{
    ExecutionError, HistoryError, HistoryLimits, OrderFill, SubmitOrderCommand,
    SubmitOrderUseCase,
};

// Re-export port traits for integration tests
pub use application::ports::{MarketPublisher, PortfolioRepository, PriceOracle};

pub use presentation::{AppState, WsState, create_router};

use axum::{Router, routing::get};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// The market server: live feed, execution engine and HTTP surface
pub struct MarketServer<C: Clock + 'static> {
    pub config: MarketConfig,
    pub clock: Arc<C>,
    pub tickers: Arc<InMemoryTickerStore>,
    pub portfolios: Arc<InMemoryPortfolioRepository>,
    pub publisher: Arc<BroadcastMarketPublisher>,
    pub research: Arc<SyntheticResearchFeed>,
}

impl<C: Clock + 'static> MarketServer<C> {
    /// Build the server from an already validated config
    pub fn with_clock(config: MarketConfig, clock: Arc<C>) -> Self {
        let tickers = Arc::new(InMemoryTickerStore::new(&config.instruments));
        let publisher = Arc::new(BroadcastMarketPublisher::new(
            config.server.stream_capacity,
            tickers.all(),
        ));
        let portfolios = Arc::new(InMemoryPortfolioRepository::new(
            config.portfolios.starting_cash,
        ));
        let research = Arc::new(match config.simulation.seed {
            Some(seed) => SyntheticResearchFeed::seeded(seed),
            None => SyntheticResearchFeed::new(),
        });

        MarketServer {
            config,
            clock,
            tickers,
            portfolios,
            publisher,
            research,
        }
    }

    /// Open the portfolios listed in the config
    pub async fn open_configured_portfolios(&self) {
        for user_id in &self.config.portfolios.accounts {
            let portfolio = self.portfolios.get_or_create(user_id).await;
            info!(user_id = %user_id, portfolio_id = %portfolio.id, "portfolio opened");
        }
    }

    /// Create the REST API router
    pub fn rest_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.tickers),
            Arc::clone(&self.portfolios),
            Arc::clone(&self.publisher),
            Arc::clone(&self.research),
            self.config.history.limits(),
        ));

        create_router(state)
    }

    /// Create WebSocket state
    pub fn ws_state(&self) -> Arc<WsState> {
        Arc::new(WsState {
            publisher: Arc::clone(&self.publisher),
        })
    }

    /// REST API plus the `/ws` market stream
    pub fn router(&self) -> Router {
        let ws = Router::new()
            .route("/ws", get(presentation::ws_handler))
            .with_state(self.ws_state());

        self.rest_router().merge(ws)
    }

    /// A simulator wired to this server's store and publisher. Seeded from
    /// the config when a seed is set.
    pub fn simulator(&self) -> PriceSimulator<BroadcastMarketPublisher, StdRng> {
        let rng = match self.config.simulation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        PriceSimulator::new(
            Arc::clone(&self.tickers),
            Arc::clone(&self.publisher),
            self.config.simulation.random_walk(),
            rng,
        )
    }

    /// Serve until Ctrl-C, ticking the market in the background
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.server.bind_address();
        let listener = TcpListener::bind(&addr).await?;

        let simulator = self
            .simulator()
            .start(self.config.simulation.tick_interval());

        info!(
            address = %addr,
            instruments = self.tickers.len(),
            tick_interval_ms = self.config.simulation.tick_interval_ms,
            "market simulator listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Some(simulator) = simulator.stop().await {
            info!(generation = simulator.generation(), "market simulator shut down");
        }

        Ok(())
    }
}

impl MarketServer<SimulationClock> {
    /// Validate `config`, build the server on a real-time clock and open the
    /// configured portfolios
    pub async fn from_config(config: MarketConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let server = Self::with_clock(config, Arc::new(SimulationClock::new()));
        server.open_configured_portfolios().await;
        Ok(server)
    }

    /// Build on a frozen clock (for testing)
    pub fn fixed_time(config: MarketConfig) -> Self {
        Self::with_clock(config, Arc::new(SimulationClock::fixed()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
