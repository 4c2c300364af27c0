//! Messages pushed to market data subscribers.
//!
//! Wire format: `{"type": "SNAPSHOT" | "UPDATE", "data": [Ticker, ...]}`.

use crate::domain::entities::Ticker;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageKind {
    /// Full state, sent once when a subscriber connects
    Snapshot,
    /// Full state after a simulation tick
    Update,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Tick generation the data belongs to (0 = opening state). Not on the wire.
    #[serde(skip)]
    pub generation: u64,
    pub data: Arc<Vec<Ticker>>,
}

impl MarketMessage {
    pub fn snapshot(generation: u64, data: Arc<Vec<Ticker>>) -> Self {
        MarketMessage {
            kind: MessageKind::Snapshot,
            generation,
            data,
        }
    }

    pub fn update(generation: u64, data: Arc<Vec<Ticker>>) -> Self {
        MarketMessage {
            kind: MessageKind::Update,
            generation,
            data,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
