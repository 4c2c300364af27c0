use crate::application::ports::{PortfolioRepository, PortfolioTransaction, PortfolioView};
use crate::domain::{Portfolio, Position, Symbol, Trade};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Everything owned by one portfolio
#[derive(Debug)]
struct PortfolioBook {
    portfolio: Portfolio,
    positions: IndexMap<Symbol, Position>,
    /// Oldest first, append only
    trades: Vec<Trade>,
}

/// In-memory portfolio repository
///
/// Each portfolio sits behind its own async mutex. A transaction holds that
/// mutex from `begin` until it is committed or dropped, which serializes
/// orders per portfolio while leaving other portfolios free to proceed.
pub struct InMemoryPortfolioRepository {
    books: Arc<DashMap<String, Arc<Mutex<PortfolioBook>>>>,
    starting_cash: Decimal,
}

impl InMemoryPortfolioRepository {
    pub fn new(starting_cash: Decimal) -> Self {
        Self {
            books: Arc::new(DashMap::new()),
            starting_cash,
        }
    }

    pub fn starting_cash(&self) -> Decimal {
        self.starting_cash
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn book(&self, user_id: &str) -> Option<Arc<Mutex<PortfolioBook>>> {
        // Clone the Arc out so no shard lock is held across an await
        self.books.get(user_id).map(|entry| Arc::clone(entry.value()))
    }
}

impl Clone for InMemoryPortfolioRepository {
    fn clone(&self) -> Self {
        Self {
            books: Arc::clone(&self.books),
            starting_cash: self.starting_cash,
        }
    }
}

#[async_trait]
impl PortfolioRepository for InMemoryPortfolioRepository {
    type Transaction = InMemoryPortfolioTransaction;

    async fn get_or_create(&self, user_id: &str) -> Portfolio {
        let book = Arc::clone(
            self.books
                .entry(user_id.to_string())
                .or_insert_with(|| {
                    Arc::new(Mutex::new(PortfolioBook {
                        portfolio: Portfolio::new(user_id, self.starting_cash, Utc::now()),
                        positions: IndexMap::new(),
                        trades: Vec::new(),
                    }))
                })
                .value(),
        );
        let book = book.lock().await;
        book.portfolio.clone()
    }

    async fn begin(&self, user_id: &str) -> Option<InMemoryPortfolioTransaction> {
        let guard = self.book(user_id)?.lock_owned().await;
        Some(InMemoryPortfolioTransaction {
            portfolio: guard.portfolio.clone(),
            positions: guard.positions.clone(),
            trades: Vec::new(),
            guard,
        })
    }

    async fn view(&self, user_id: &str, trade_limit: usize) -> Option<PortfolioView> {
        let book = self.book(user_id)?;
        let book = book.lock().await;
        Some(PortfolioView {
            portfolio: book.portfolio.clone(),
            positions: book.positions.values().cloned().collect(),
            recent_trades: book.trades.iter().rev().take(trade_limit).cloned().collect(),
        })
    }

    async fn exists(&self, user_id: &str) -> bool {
        self.books.contains_key(user_id)
    }
}

/// Staged changes plus the lock on the book they will be written to
pub struct InMemoryPortfolioTransaction {
    guard: OwnedMutexGuard<PortfolioBook>,
    portfolio: Portfolio,
    positions: IndexMap<Symbol, Position>,
    trades: Vec<Trade>,
}

impl PortfolioTransaction for InMemoryPortfolioTransaction {
    fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    fn set_cash(&mut self, cash: Decimal) {
        self.portfolio.cash = cash;
    }

    fn position(&self, symbol: &Symbol) -> Option<&Position> {
        self.positions.get(symbol)
    }

    fn put_position(&mut self, position: Position) {
        self.positions.insert(position.symbol.clone(), position);
    }

    fn remove_position(&mut self, symbol: &Symbol) {
        self.positions.shift_remove(symbol);
    }

    fn record_trade(&mut self, trade: Trade) {
        self.trades.push(trade);
    }

    fn commit(self) {
        let InMemoryPortfolioTransaction {
            mut guard,
            portfolio,
            positions,
            trades,
        } = self;
        guard.portfolio = portfolio;
        guard.positions = positions;
        guard.trades.extend(trades);
    }
}
