use crate::domain::value_objects::{PortfolioId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's cash account
///
/// Only the order execution engine mutates a portfolio once it exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: PortfolioId,
    pub user_id: String,
    pub cash: Decimal,
    pub created_at: Timestamp,
}

impl Portfolio {
    pub fn new(user_id: impl Into<String>, starting_cash: Decimal, now: Timestamp) -> Self {
        Portfolio {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            cash: starting_cash,
            created_at: now,
        }
    }

    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.cash >= amount
    }
}
