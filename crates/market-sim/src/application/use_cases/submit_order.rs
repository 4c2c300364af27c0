use crate::application::ports::{PortfolioRepository, PortfolioTransaction, PriceOracle};
use crate::domain::{Clock, Position, Side, Symbol, Trade, TradeId, quote_to_price};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    pub user_id: String,
    pub symbol: String,
    pub side: Side,
    pub quantity: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FillStatus {
    Filled,
}

/// Outcome of an accepted market order. Orders are filled in full or not
/// at all.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderFill {
    pub status: FillStatus,
    pub trade_id: TradeId,
    pub symbol: Symbol,
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
    #[error("Quantity must be a positive integer")]
    InvalidQuantity,
    #[error("Portfolio not found for user {0}")]
    PortfolioNotFound(String),
    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },
    #[error("No position in {0}")]
    NoPosition(String),
    #[error("Insufficient position: held {held}, requested {requested}")]
    InsufficientPosition { held: u64, requested: u64 },
}

impl ExecutionError {
    /// Rejections caused by the order itself, as opposed to server state
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ExecutionError::PortfolioNotFound(_))
    }
}

/// Fills market orders at the current simulated price
///
/// Each order is one portfolio transaction: the cash movement, the position
/// change and the trade record are committed together or not at all.
/// Orders on the same portfolio are serialized by the repository.
pub struct SubmitOrderUseCase<C, O, R>
where
    C: Clock,
    O: PriceOracle,
    R: PortfolioRepository,
{
    clock: Arc<C>,
    oracle: Arc<O>,
    portfolios: Arc<R>,
}

impl<C, O, R> SubmitOrderUseCase<C, O, R>
where
    C: Clock,
    O: PriceOracle,
    R: PortfolioRepository,
{
    pub fn new(clock: Arc<C>, oracle: Arc<O>, portfolios: Arc<R>) -> Self {
        Self {
            clock,
            oracle,
            portfolios,
        }
    }

    pub async fn execute(&self, command: SubmitOrderCommand) -> Result<OrderFill, ExecutionError> {
        match self.fill(&command).await {
            Ok(fill) => {
                info!(
                    user_id = %command.user_id,
                    symbol = %fill.symbol,
                    side = %fill.side,
                    quantity = fill.quantity,
                    price = %fill.price,
                    trade_id = %fill.trade_id,
                    "order filled"
                );
                Ok(fill)
            }
            Err(e) if e.is_user_error() => {
                debug!(user_id = %command.user_id, symbol = %command.symbol, error = %e, "order rejected");
                Err(e)
            }
            Err(e) => {
                warn!(user_id = %command.user_id, symbol = %command.symbol, error = %e, "order failed");
                Err(e)
            }
        }
    }

    async fn fill(&self, command: &SubmitOrderCommand) -> Result<OrderFill, ExecutionError> {
        if command.quantity == 0 {
            return Err(ExecutionError::InvalidQuantity);
        }

        let symbol = Symbol::new(command.symbol.as_str())
            .map_err(|_| ExecutionError::UnknownSymbol(command.symbol.clone()))?;

        // Price is read once and used for both validation and execution
        let price = self
            .oracle
            .current_price(&symbol)
            .and_then(quote_to_price)
            .ok_or_else(|| ExecutionError::UnknownSymbol(symbol.to_string()))?;

        let quantity = command.quantity;
        let notional = price
            .checked_mul(Decimal::from(quantity))
            .ok_or(ExecutionError::InvalidQuantity)?;

        let mut tx = self
            .portfolios
            .begin(&command.user_id)
            .await
            .ok_or_else(|| ExecutionError::PortfolioNotFound(command.user_id.clone()))?;

        let now = self.clock.now();
        let cash = tx.portfolio().cash;

        // Returning early drops `tx`, which discards the staged changes
        match command.side {
            Side::Buy => {
                if !tx.portfolio().can_afford(notional) {
                    return Err(ExecutionError::InsufficientFunds {
                        required: notional,
                        available: cash,
                    });
                }

                let position = match tx.position(&symbol) {
                    Some(existing) => {
                        let mut position = existing.clone();
                        position
                            .increase(quantity, notional, now)
                            .map_err(|_| ExecutionError::InvalidQuantity)?;
                        position
                    }
                    None => Position::open(symbol.clone(), quantity, price, now),
                };

                tx.put_position(position);
            }
            Side::Sell => {
                let mut position = tx
                    .position(&symbol)
                    .cloned()
                    .ok_or_else(|| ExecutionError::NoPosition(symbol.to_string()))?;

                if position.quantity < quantity {
                    return Err(ExecutionError::InsufficientPosition {
                        held: position.quantity,
                        requested: quantity,
                    });
                }

                if position.quantity == quantity {
                    tx.remove_position(&symbol);
                } else {
                    position.decrease(quantity, now);
                    tx.put_position(position);
                }
            }
        }

        let cash = cash
            .checked_add(command.side.cash_flow(notional))
            .ok_or(ExecutionError::InvalidQuantity)?;
        tx.set_cash(cash);

        let trade = Trade::new(
            tx.portfolio().id,
            symbol.clone(),
            command.side,
            quantity,
            price,
            now,
        );
        let trade_id = trade.id;
        tx.record_trade(trade);
        tx.commit();

        Ok(OrderFill {
            status: FillStatus::Filled,
            trade_id,
            symbol,
            side: command.side,
            quantity,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InstrumentSpec, TickUpdate};
    use crate::infrastructure::{InMemoryPortfolioRepository, InMemoryTickerStore, SimulationClock};
    use rust_decimal_macros::dec;

    type TestUseCase =
        SubmitOrderUseCase<SimulationClock, InMemoryTickerStore, InMemoryPortfolioRepository>;

    async fn setup_test_env() -> (
        TestUseCase,
        Arc<InMemoryTickerStore>,
        Arc<InMemoryPortfolioRepository>,
    ) {
        let clock = Arc::new(SimulationClock::fixed());
        let store = Arc::new(InMemoryTickerStore::new(&InstrumentSpec::default_universe()));
        let portfolios = Arc::new(InMemoryPortfolioRepository::new(dec!(100000)));
        portfolios.get_or_create("alice").await;

        let use_case = SubmitOrderUseCase::new(clock, Arc::clone(&store), Arc::clone(&portfolios));
        (use_case, store, portfolios)
    }

    fn order(side: Side, symbol: &str, quantity: u64) -> SubmitOrderCommand {
        SubmitOrderCommand {
            user_id: "alice".to_string(),
            symbol: symbol.to_string(),
            side,
            quantity,
        }
    }

    /// Move the quote the way a simulator tick would
    fn set_price(store: &InMemoryTickerStore, symbol: &str, price: f64) {
        let symbol = Symbol::new(symbol).unwrap();
        let previous = store.current_price(&symbol).unwrap();
        let update = TickUpdate {
            price,
            change: price - previous,
            change_percent: (price - previous) / previous * 100.0,
            volume_delta: 0,
        };
        assert!(store.apply_tick(&symbol, &update).is_some());
    }

    #[tokio::test]
    async fn test_buy_debits_cash_and_opens_position() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "AAPL", 150.0);

        let fill = use_case.execute(order(Side::Buy, "AAPL", 10)).await.unwrap();

        assert_eq!(fill.status, FillStatus::Filled);
        assert_eq!(fill.price, dec!(150));
        assert_eq!(fill.quantity, 10);

        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.portfolio.cash, dec!(98500));
        assert_eq!(view.positions.len(), 1);
        assert_eq!(view.positions[0].quantity, 10);
        assert_eq!(view.positions[0].avg_price, dec!(150));
        assert_eq!(view.recent_trades.len(), 1);
        assert_eq!(view.recent_trades[0].id, fill.trade_id);
    }

    #[tokio::test]
    async fn test_full_sell_credits_cash_and_removes_position() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "AAPL", 150.0);
        use_case.execute(order(Side::Buy, "AAPL", 10)).await.unwrap();

        set_price(&store, "AAPL", 160.0);
        let fill = use_case.execute(order(Side::Sell, "AAPL", 10)).await.unwrap();
        assert_eq!(fill.price, dec!(160));

        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.portfolio.cash, dec!(100100));
        assert!(view.positions.is_empty());
        assert_eq!(view.recent_trades.len(), 2);
        // Newest first
        assert_eq!(view.recent_trades[0].side, Side::Sell);
        assert_eq!(view.recent_trades[1].side, Side::Buy);
    }

    #[tokio::test]
    async fn test_partial_sell_keeps_average_price() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "TSLA", 200.0);
        use_case.execute(order(Side::Buy, "TSLA", 10)).await.unwrap();

        set_price(&store, "TSLA", 250.0);
        use_case.execute(order(Side::Sell, "TSLA", 4)).await.unwrap();

        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.positions[0].quantity, 6);
        assert_eq!(view.positions[0].avg_price, dec!(200));
        assert_eq!(view.portfolio.cash, dec!(100000) - dec!(2000) + dec!(1000));
    }

    #[tokio::test]
    async fn test_repeated_buys_average_the_entry_price() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "MSFT", 100.0);
        use_case.execute(order(Side::Buy, "MSFT", 10)).await.unwrap();
        set_price(&store, "MSFT", 200.0);
        use_case.execute(order(Side::Buy, "MSFT", 10)).await.unwrap();

        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.positions.len(), 1);
        assert_eq!(view.positions[0].quantity, 20);
        assert_eq!(view.positions[0].avg_price, dec!(150));
        assert_eq!(view.portfolio.cash, dec!(97000));
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_portfolio_untouched() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "AAPL", 150.0);
        use_case.execute(order(Side::Buy, "AAPL", 10)).await.unwrap();
        let before = portfolios.view("alice", 50).await.unwrap();

        set_price(&store, "BTC", 45000.0);
        let err = use_case.execute(order(Side::Buy, "BTC", 3)).await.unwrap_err();

        assert_eq!(
            err,
            ExecutionError::InsufficientFunds {
                required: dec!(135000),
                available: dec!(98500),
            }
        );
        let after = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(after.portfolio, before.portfolio);
        assert_eq!(after.positions, before.positions);
        assert_eq!(after.recent_trades.len(), 1);
    }

    #[tokio::test]
    async fn test_sell_rejections() {
        let (use_case, store, portfolios) = setup_test_env().await;

        let err = use_case.execute(order(Side::Sell, "AAPL", 1)).await.unwrap_err();
        assert_eq!(err, ExecutionError::NoPosition("AAPL".to_string()));

        set_price(&store, "AAPL", 150.0);
        use_case.execute(order(Side::Buy, "AAPL", 5)).await.unwrap();
        let err = use_case.execute(order(Side::Sell, "AAPL", 6)).await.unwrap_err();
        assert_eq!(
            err,
            ExecutionError::InsufficientPosition {
                held: 5,
                requested: 6
            }
        );

        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.positions[0].quantity, 5);
        assert_eq!(view.portfolio.cash, dec!(99250));
        assert_eq!(view.recent_trades.len(), 1);
    }

    #[tokio::test]
    async fn test_input_rejections() {
        let (use_case, _store, _portfolios) = setup_test_env().await;

        let err = use_case.execute(order(Side::Buy, "AAPL", 0)).await.unwrap_err();
        assert_eq!(err, ExecutionError::InvalidQuantity);

        let err = use_case.execute(order(Side::Buy, "NOPE", 1)).await.unwrap_err();
        assert_eq!(err, ExecutionError::UnknownSymbol("NOPE".to_string()));
        assert!(err.is_user_error());

        let err = use_case.execute(order(Side::Buy, "BRK.B", 1)).await.unwrap_err();
        assert_eq!(err, ExecutionError::UnknownSymbol("BRK.B".to_string()));

        let mut command = order(Side::Buy, "AAPL", 1);
        command.user_id = "ghost".to_string();
        let err = use_case.execute(command).await.unwrap_err();
        assert_eq!(err, ExecutionError::PortfolioNotFound("ghost".to_string()));
        assert!(!err.is_user_error());
    }

    #[tokio::test]
    async fn test_position_size_overflow_is_rejected() {
        let store = Arc::new(InMemoryTickerStore::new(&InstrumentSpec::default_universe()));
        let portfolios = Arc::new(InMemoryPortfolioRepository::new(dec!(100000000000000000000)));
        portfolios.get_or_create("whale").await;
        let use_case = SubmitOrderUseCase::new(
            Arc::new(SimulationClock::fixed()),
            Arc::clone(&store),
            Arc::clone(&portfolios),
        );
        set_price(&store, "SBIN", 1.0);

        let mut command = order(Side::Buy, "SBIN", u64::MAX);
        command.user_id = "whale".to_string();
        use_case.execute(command.clone()).await.unwrap();
        let before = portfolios.view("whale", 50).await.unwrap();

        command.quantity = 1;
        let err = use_case.execute(command).await.unwrap_err();

        assert_eq!(err, ExecutionError::InvalidQuantity);
        let after = portfolios.view("whale", 50).await.unwrap();
        assert_eq!(after.portfolio.cash, before.portfolio.cash);
        assert_eq!(after.positions[0].quantity, u64::MAX);
        assert_eq!(after.recent_trades.len(), 1);
    }

    #[tokio::test]
    async fn test_symbol_lookup_is_case_insensitive() {
        let (use_case, _store, _portfolios) = setup_test_env().await;
        let fill = use_case.execute(order(Side::Buy, "aapl", 1)).await.unwrap();
        assert_eq!(fill.symbol.as_str(), "AAPL");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buys_do_not_lose_updates() {
        let (use_case, store, portfolios) = setup_test_env().await;
        set_price(&store, "AAPL", 100.0);
        let use_case = Arc::new(use_case);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let use_case = Arc::clone(&use_case);
                tokio::spawn(async move { use_case.execute(order(Side::Buy, "AAPL", 1)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let view = portfolios.view("alice", 100).await.unwrap();
        assert_eq!(view.portfolio.cash, dec!(95000));
        assert_eq!(view.positions[0].quantity, 50);
        assert_eq!(view.recent_trades.len(), 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buys_cannot_overdraw() {
        let (use_case, store, portfolios) = setup_test_env().await;
        // Each order costs 30k, only three fit into 100k
        set_price(&store, "BTC", 30000.0);
        let use_case = Arc::new(use_case);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let use_case = Arc::clone(&use_case);
                tokio::spawn(async move { use_case.execute(order(Side::Buy, "BTC", 1)).await })
            })
            .collect();

        let mut filled = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => filled += 1,
                Err(e) => assert!(matches!(e, ExecutionError::InsufficientFunds { .. })),
            }
        }

        assert_eq!(filled, 3);
        let view = portfolios.view("alice", 50).await.unwrap();
        assert_eq!(view.portfolio.cash, dec!(10000));
        assert_eq!(view.positions[0].quantity, 3);
    }
}
