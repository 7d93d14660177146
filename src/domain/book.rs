// ============================================================================
// Order Book Domain Model
// ============================================================================

use crate::domain::{Order, OrderId, Side};
use crate::numeric::{Price, Quantity};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Price Level
// ============================================================================

/// FIFO queue of resting orders at one price, with a cached total quantity.
/// Invariant: `total_quantity` equals the sum of the queued orders' remaining
/// quantities after every mutation.
#[derive(Debug)]
pub struct PriceLevel {
    price: Price,
    orders: VecDeque<Arc<Order>>,
    total_quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_quantity: Quantity::ZERO,
        }
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Append at the tail of the time-priority queue.
    pub fn add_order(&mut self, order: Arc<Order>) {
        self.total_quantity += order.remaining_quantity();
        self.orders.push_back(order);
    }

    pub fn front(&self) -> Option<&Arc<Order>> {
        self.orders.front()
    }

    /// Pop the head. Only called once the head is fully filled, so the cached
    /// total needs no adjustment here.
    pub fn pop_front(&mut self) -> Option<Arc<Order>> {
        self.orders.pop_front()
    }

    /// Splice a specific order out of the queue, adjusting the total.
    pub fn remove_order(&mut self, order_id: OrderId) -> Option<Arc<Order>> {
        let position = self.orders.iter().position(|o| o.id() == order_id)?;
        let order = self.orders.remove(position)?;
        self.total_quantity -= order.remaining_quantity();
        Some(order)
    }

    pub fn subtract_quantity(&mut self, quantity: Quantity) {
        self.total_quantity -= quantity;
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }
}

// ============================================================================
// Book Side
// ============================================================================

/// One side of the book: price levels sorted by key, with the side deciding
/// which end is the top of book (bids: highest, asks: lowest).
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Insert a resting order, creating its price level on first use.
    pub fn add_order(&mut self, order: &Arc<Order>) {
        let price = order.price();
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
            .add_order(Arc::clone(order));
    }

    /// Splice an order out of its level, dropping the level if it empties.
    /// Returns false when the order is not resting on this side.
    pub fn remove_order(&mut self, order: &Order) -> bool {
        let price = order.price();
        let Some(level) = self.levels.get_mut(&price) else {
            return false;
        };

        let removed = level.remove_order(order.id()).is_some();
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub fn remove_level_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    pub fn volume_at(&self, price: Price) -> Quantity {
        self.levels
            .get(&price)
            .map_or(Quantity::ZERO, PriceLevel::total_quantity)
    }

    /// Visit levels from the top of book in priority order, stopping as soon
    /// as the visitor returns false.
    pub fn walk_from_best<F>(&self, mut visit: F)
    where
        F: FnMut(&PriceLevel) -> bool,
    {
        let iter: Box<dyn Iterator<Item = &PriceLevel>> = match self.side {
            Side::Buy => Box::new(self.levels.values().rev()),
            Side::Sell => Box::new(self.levels.values()),
        };

        for level in iter {
            if !visit(level) {
                break;
            }
        }
    }

    /// Top `num_levels` of this side in priority order.
    pub fn depth(&self, num_levels: usize) -> Vec<(Price, Quantity)> {
        if num_levels == 0 {
            return Vec::new();
        }

        let mut levels = Vec::with_capacity(num_levels.min(self.levels.len()));
        self.walk_from_best(|level| {
            levels.push((level.price(), level.total_quantity()));
            levels.len() < num_levels
        });
        levels
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

// ============================================================================
// Book Snapshot
// ============================================================================

/// Immutable snapshot of both sides at a chosen depth.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BookSnapshot {
    pub symbol: String,
    /// Bid levels (price, quantity), best first.
    pub bids: Vec<(Price, Quantity)>,
    /// Ask levels (price, quantity), best first.
    pub asks: Vec<(Price, Quantity)>,
    /// Current spread (ask - bid).
    pub spread: Option<Price>,
    /// Mid price, rounded towards the bid.
    pub mid_price: Option<Price>,
}

impl BookSnapshot {
    pub fn with_depth(
        symbol: String,
        bids: Vec<(Price, Quantity)>,
        asks: Vec<(Price, Quantity)>,
    ) -> Self {
        let top = match (bids.first(), asks.first()) {
            (Some((bid, _)), Some((ask, _))) => Some((*bid, *ask)),
            _ => None,
        };

        Self {
            symbol,
            bids,
            asks,
            spread: top.map(|(bid, ask)| ask - bid),
            mid_price: top.map(|(bid, ask)| Price::new((bid.value() + ask.value()) / 2)),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|(price, _)| *price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|(price, _)| *price)
    }

    pub fn total_bid_quantity(&self) -> Quantity {
        self.bids
            .iter()
            .fold(Quantity::ZERO, |acc, (_, qty)| acc + *qty)
    }

    pub fn total_ask_quantity(&self) -> Quantity {
        self.asks
            .iter()
            .fold(Quantity::ZERO, |acc, (_, qty)| acc + *qty)
    }
}
