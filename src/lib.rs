// ============================================================================
// Order Book Engine Library
// Single-symbol limit order book with price-time priority matching
// ============================================================================

//! # Order Book Engine
//!
//! A single-symbol limit order book and matching engine.
//!
//! ## Features
//!
//! - **Price-time (FIFO) priority** matching with per-level time queues
//! - **Market, Limit, Stop and StopLimit** order types, with stop orders
//!   triggered off the last trade price and cascading within one submission
//! - **GoodTillCancel and FillAndKill** time-in-force handling
//! - **Coarse-grained locking**: mutations serialize on one write lock,
//!   market-data queries share a read lock
//! - **Event notifications** for every order lifecycle transition
//!
//! ## Example
//!
//! ```rust
//! use orderbook_engine::numeric::{Price, Quantity};
//! use orderbook_engine::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = MatchingEngine::new("BTC-USD");
//!
//! // Rest a sell, then cross it with a buy.
//! let sell = Arc::new(Order::limit(
//!     OrderId::new(1),
//!     "BTC-USD",
//!     Side::Sell,
//!     Quantity::new(1),
//!     Price::new(50_000),
//! ));
//! engine.submit_order(sell);
//! assert_eq!(engine.best_ask(), Some(Price::new(50_000)));
//!
//! let buy = Arc::new(Order::limit(
//!     OrderId::new(2),
//!     "BTC-USD",
//!     Side::Buy,
//!     Quantity::new(1),
//!     Price::new(50_000),
//! ));
//! let trades = engine.submit_order(buy);
//!
//! assert_eq!(trades.len(), 1);
//! assert_eq!(trades[0].price, Price::new(50_000));
//! assert!(engine.is_empty());
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        BookSnapshot, Order, OrderId, OrderStatus, OrderType, Side, StopRegistry, TimeInForce,
        Trade,
    };
    pub use crate::engine::{MatchingEngine, MatchingEngineBuilder};
    pub use crate::interfaces::{EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent};
}
