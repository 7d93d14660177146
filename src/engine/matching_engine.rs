// ============================================================================
// Matching Engine
// Core business logic for order matching
// ============================================================================

use crate::domain::{
    BookSide, BookSnapshot, Order, OrderId, OrderType, Side, StopRegistry, TimeInForce, Trade,
};
use crate::interfaces::{EventHandler, NoOpEventHandler, OrderEvent};
use crate::numeric::{Price, Quantity};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Everything the engine mutates, guarded by one lock so that a matching
/// cycle is atomic to observers and price-time determinism holds across
/// concurrent submitters.
#[derive(Debug)]
struct BookState {
    bids: BookSide,
    asks: BookSide,
    /// Live orders by id: resting in a side book or pending in the registry.
    orders: HashMap<OrderId, Arc<Order>>,
    stops: StopRegistry,
    last_trade_price: Option<Price>,
}

/// Price-time priority matching engine for a single symbol.
///
/// Submissions, cancels and modifies serialize on a write lock; market-data
/// queries take the shared read lock. Trades returned from one
/// `submit_order` call are contiguous and ordered by match step.
pub struct MatchingEngine {
    /// Trading symbol (e.g. "BTC-USD")
    symbol: Arc<String>,

    state: RwLock<BookState>,

    /// Event handler for processing events
    event_handler: Arc<dyn EventHandler>,

    /// Sequence counter for order sequencing
    sequence_counter: AtomicU64,
}

impl MatchingEngine {
    /// Create a new matching engine for `symbol`.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self::with_event_handler(symbol, Arc::new(NoOpEventHandler))
    }

    pub fn with_event_handler(
        symbol: impl Into<String>,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            symbol: Arc::new(symbol.into()),
            state: RwLock::new(BookState {
                bids: BookSide::new(Side::Buy),
                asks: BookSide::new(Side::Sell),
                orders: HashMap::new(),
                stops: StopRegistry::new(),
                last_trade_price: None,
            }),
            event_handler,
            sequence_counter: AtomicU64::new(0),
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Submit an order and return the trades it produced, including any
    /// executions of stop orders its trades triggered.
    pub fn submit_order(&self, order: Arc<Order>) -> Vec<Trade> {
        let mut events = Vec::new();

        if order.symbol() != self.symbol.as_str() {
            order.reject();
            events.push(OrderEvent::OrderRejected {
                order_id: order.id(),
                reason: format!("unknown symbol {}", order.symbol()),
                timestamp: Utc::now(),
            });
            self.event_handler.on_events(events);
            return Vec::new();
        }

        if order.is_rejected() {
            events.push(OrderEvent::OrderRejected {
                order_id: order.id(),
                reason: "order failed validation".to_string(),
                timestamp: Utc::now(),
            });
            self.event_handler.on_events(events);
            return Vec::new();
        }

        let seq = self.sequence_counter.fetch_add(1, Ordering::AcqRel);
        order.set_sequence_number(seq);

        events.push(OrderEvent::OrderAccepted {
            order_id: order.id(),
            timestamp: Utc::now(),
        });

        let mut state = self.state.write();
        state.orders.insert(order.id(), Arc::clone(&order));

        let mut trades = self.dispatch(&mut state, &order, &mut events);

        if !trades.is_empty() {
            state.last_trade_price = trades.last().map(|t| t.price);
            self.run_trigger_cascade(&mut state, &mut trades, &mut events);
        }

        self.evict_if_terminal(&mut state, &order);
        drop(state);

        self.event_handler.on_events(events);
        trades
    }

    /// Cancel a live order. Returns false for unknown or already terminal
    /// ids.
    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        let mut state = self.state.write();

        let Some(order) = state.orders.get(&order_id).cloned() else {
            return false;
        };

        if order.is_stop_order() && !order.is_triggered() {
            state.stops.remove(order_id);
        } else {
            let removed = match order.side() {
                Side::Buy => state.bids.remove_order(&order),
                Side::Sell => state.asks.remove_order(&order),
            };
            debug_assert!(removed, "live order missing from its side book");
        }

        order.try_cancel();
        state.orders.remove(&order_id);
        drop(state);

        self.event_handler.on_event(OrderEvent::OrderCancelled {
            order_id,
            timestamp: Utc::now(),
        });
        true
    }

    /// Replace an order's quantity and prices. The order re-enters its
    /// (possibly new) price level at the tail, losing time priority even
    /// when nothing changed. Validation happens before the book is touched,
    /// so a failed modify leaves the original position intact.
    ///
    /// A `Price::ZERO` stop price keeps the current stop price.
    pub fn modify_order(
        &self,
        order_id: OrderId,
        new_quantity: Quantity,
        new_price: Price,
        new_stop_price: Price,
    ) -> bool {
        let mut events = Vec::new();
        let mut state = self.state.write();

        let Some(order) = state.orders.get(&order_id).cloned() else {
            return false;
        };

        // Untriggered stops sit at New and are not modifiable.
        if !order.is_active() {
            return false;
        }
        if new_quantity.is_zero() || new_quantity < order.filled_quantity() {
            return false;
        }
        if order.order_type().uses_limit_price() && new_price.value() <= 0 {
            return false;
        }
        let stop_price = if order.order_type().uses_stop_price() && new_stop_price.is_unset() {
            order.stop_price()
        } else {
            new_stop_price
        };
        if order.order_type().uses_stop_price() && stop_price.value() <= 0 {
            return false;
        }

        let removed = match order.side() {
            Side::Buy => state.bids.remove_order(&order),
            Side::Sell => state.asks.remove_order(&order),
        };
        debug_assert!(removed, "live order missing from its side book");

        let applied = order.modify(new_quantity, new_price, stop_price);
        debug_assert!(applied, "modify failed after validation");

        events.push(OrderEvent::OrderModified {
            order_id,
            quantity: new_quantity,
            price: order.price(),
            timestamp: Utc::now(),
        });

        if order.is_active() {
            match order.side() {
                Side::Buy => state.bids.add_order(&order),
                Side::Sell => state.asks.add_order(&order),
            }
            events.push(OrderEvent::OrderAddedToBook {
                order_id,
                price: order.price(),
                quantity: order.remaining_quantity(),
                timestamp: Utc::now(),
            });
        } else {
            // Shrunk to its filled quantity: the order completed.
            state.orders.remove(&order_id);
        }

        drop(state);
        self.event_handler.on_events(events);
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Highest resting bid price, `None` when the bid book is empty.
    pub fn best_bid(&self) -> Option<Price> {
        self.state.read().bids.best_price()
    }

    /// Lowest resting ask price, `None` when the ask book is empty.
    pub fn best_ask(&self) -> Option<Price> {
        self.state.read().asks.best_price()
    }

    /// Total resting quantity at a price level, zero when the level is absent.
    pub fn volume_at(&self, side: Side, price: Price) -> Quantity {
        let state = self.state.read();
        match side {
            Side::Buy => state.bids.volume_at(price),
            Side::Sell => state.asks.volume_at(price),
        }
    }

    /// Look up a live order. Terminal orders are evicted, so filled,
    /// cancelled and rejected ids return `None`; callers observe final
    /// status through their own retained handle.
    pub fn get_order(&self, order_id: OrderId) -> Option<Arc<Order>> {
        self.state.read().orders.get(&order_id).cloned()
    }

    /// Whether both side books are empty (pending stops do not count).
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.bids.is_empty() && state.asks.is_empty()
    }

    pub fn last_trade_price(&self) -> Option<Price> {
        self.state.read().last_trade_price
    }

    /// Number of stop orders waiting on their trigger.
    pub fn pending_stop_count(&self) -> usize {
        self.state.read().stops.len()
    }

    /// Get order book snapshot
    pub fn get_snapshot(&self, depth: usize) -> BookSnapshot {
        let state = self.state.read();
        BookSnapshot::with_depth(
            (*self.symbol).clone(),
            state.bids.depth(depth),
            state.asks.depth(depth),
        )
    }

    /// Get spread
    pub fn spread(&self) -> Option<Price> {
        let state = self.state.read();
        match (state.bids.best_price(), state.asks.best_price()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<Price> {
        let state = self.state.read();
        match (state.bids.best_price(), state.asks.best_price()) {
            (Some(bid), Some(ask)) => Some(Price::new((bid.value() + ask.value()) / 2)),
            _ => None,
        }
    }

    /// Get the engine's symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    /// Route by effective type: a triggered stop matches with its promoted
    /// semantics while keeping its id.
    fn dispatch(
        &self,
        state: &mut BookState,
        order: &Arc<Order>,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Trade> {
        match Self::effective_type(order) {
            OrderType::Market => self.process_market_order(state, order, events),
            OrderType::Limit => self.process_limit_order(state, order, events),
            OrderType::Stop | OrderType::StopLimit => {
                self.process_stop_order(state, order, events)
            },
        }
    }

    fn effective_type(order: &Order) -> OrderType {
        match order.order_type() {
            OrderType::Stop if order.is_triggered() => OrderType::Market,
            OrderType::StopLimit if order.is_triggered() => OrderType::Limit,
            other => other,
        }
    }

    /// Market orders execute against whatever is available and never rest.
    fn process_market_order(
        &self,
        state: &mut BookState,
        order: &Arc<Order>,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Trade> {
        let trades = self.match_order(state, order, events);

        if order.is_filled() {
            events.push(OrderEvent::OrderFilled {
                order_id: order.id(),
                total_filled: order.filled_quantity(),
                timestamp: Utc::now(),
            });
        } else {
            if !order.filled_quantity().is_zero() {
                events.push(OrderEvent::OrderPartiallyFilled {
                    order_id: order.id(),
                    filled_quantity: order.filled_quantity(),
                    remaining_quantity: order.remaining_quantity(),
                    timestamp: Utc::now(),
                });
            }
            if order.try_cancel() {
                events.push(OrderEvent::OrderCancelled {
                    order_id: order.id(),
                    timestamp: Utc::now(),
                });
            }
        }

        trades
    }

    /// Limit orders match up to their limit price; the remainder rests under
    /// GoodTillCancel and is cancelled under FillAndKill.
    fn process_limit_order(
        &self,
        state: &mut BookState,
        order: &Arc<Order>,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Trade> {
        let trades = self.match_order(state, order, events);

        if order.is_filled() {
            events.push(OrderEvent::OrderFilled {
                order_id: order.id(),
                total_filled: order.filled_quantity(),
                timestamp: Utc::now(),
            });
            return trades;
        }

        if !order.filled_quantity().is_zero() {
            events.push(OrderEvent::OrderPartiallyFilled {
                order_id: order.id(),
                filled_quantity: order.filled_quantity(),
                remaining_quantity: order.remaining_quantity(),
                timestamp: Utc::now(),
            });
        }

        if !order.is_active() {
            return trades;
        }

        match order.time_in_force() {
            TimeInForce::GoodTillCancel => {
                match order.side() {
                    Side::Buy => state.bids.add_order(order),
                    Side::Sell => state.asks.add_order(order),
                }
                events.push(OrderEvent::OrderAddedToBook {
                    order_id: order.id(),
                    price: order.price(),
                    quantity: order.remaining_quantity(),
                    timestamp: Utc::now(),
                });
            },
            TimeInForce::FillAndKill => {
                if order.try_cancel() {
                    events.push(OrderEvent::OrderCancelled {
                        order_id: order.id(),
                        timestamp: Utc::now(),
                    });
                }
            },
        }

        trades
    }

    /// Stop orders wait in the registry unless the recorded last trade price
    /// arms them immediately, in which case they skip the registry and match
    /// with their promoted semantics right away.
    fn process_stop_order(
        &self,
        state: &mut BookState,
        order: &Arc<Order>,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Trade> {
        if let Some(last_price) = state.last_trade_price {
            if order.check_stop_trigger(last_price) {
                events.push(OrderEvent::OrderTriggered {
                    order_id: order.id(),
                    stop_price: order.stop_price(),
                    last_trade_price: last_price,
                    timestamp: Utc::now(),
                });
                return self.dispatch(state, order, events);
            }
        }

        state.stops.submit(Arc::clone(order));
        Vec::new()
    }

    /// Price-time match loop against the opposing side.
    fn match_order(
        &self,
        state: &mut BookState,
        order: &Arc<Order>,
        events: &mut Vec<OrderEvent>,
    ) -> Vec<Trade> {
        let mut trades = Vec::new();

        let BookState {
            bids, asks, orders, ..
        } = state;
        let opposite = match order.side() {
            Side::Buy => asks,
            Side::Sell => bids,
        };

        // Market orders carry no bound; the side decides its direction.
        let tolerance = match Self::effective_type(order) {
            OrderType::Market => match order.side() {
                Side::Buy => Price::MAX,
                Side::Sell => Price::MIN,
            },
            _ => order.price(),
        };

        while !order.remaining_quantity().is_zero() {
            let Some(best_price) = opposite.best_price() else {
                break;
            };

            let crosses = match order.side() {
                Side::Buy => best_price <= tolerance,
                Side::Sell => best_price >= tolerance,
            };
            if !crosses {
                break;
            }

            let Some(level) = opposite.level_mut(best_price) else {
                break;
            };
            let Some(resting) = level.front().cloned() else {
                break;
            };

            let fill_quantity = order.remaining_quantity().min(resting.remaining_quantity());

            // The resting order's price wins: it arrived first.
            if !(resting.try_fill(fill_quantity) && order.try_fill(fill_quantity)) {
                debug_assert!(false, "fill refused inside the match loop");
                break;
            }

            level.subtract_quantity(fill_quantity);

            let trade = match order.side() {
                Side::Buy => Trade::new(
                    (*self.symbol).clone(),
                    order.id(),
                    resting.id(),
                    best_price,
                    fill_quantity,
                ),
                Side::Sell => Trade::new(
                    (*self.symbol).clone(),
                    resting.id(),
                    order.id(),
                    best_price,
                    fill_quantity,
                ),
            };
            events.push(OrderEvent::OrderMatched {
                trade: trade.clone(),
                timestamp: Utc::now(),
            });
            trades.push(trade);

            if resting.is_filled() {
                level.pop_front();
                orders.remove(&resting.id());
                events.push(OrderEvent::OrderFilled {
                    order_id: resting.id(),
                    total_filled: resting.filled_quantity(),
                    timestamp: Utc::now(),
                });
            }

            opposite.remove_level_if_empty(best_price);
        }

        trades
    }

    /// Drain and execute triggered stops until a pass produces none. Each
    /// wave preserves submission order; executions move the last trade price,
    /// so one wave may arm the next. The loop terminates because a stop
    /// leaves the registry exactly once.
    fn run_trigger_cascade(
        &self,
        state: &mut BookState,
        trades: &mut Vec<Trade>,
        events: &mut Vec<OrderEvent>,
    ) {
        loop {
            let Some(last_price) = state.last_trade_price else {
                return;
            };

            let triggered = state.stops.drain_triggered(last_price);
            if triggered.is_empty() {
                return;
            }

            for order in triggered {
                events.push(OrderEvent::OrderTriggered {
                    order_id: order.id(),
                    stop_price: order.stop_price(),
                    last_trade_price: last_price,
                    timestamp: Utc::now(),
                });

                let new_trades = self.dispatch(state, &order, events);
                if let Some(last) = new_trades.last() {
                    state.last_trade_price = Some(last.price);
                }
                trades.extend(new_trades);

                self.evict_if_terminal(state, &order);
            }
        }
    }

    fn evict_if_terminal(&self, state: &mut BookState, order: &Order) {
        if order.is_terminal() {
            state.orders.remove(&order.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;

    fn limit_buy(id: u64, qty: u64, price: i64) -> Arc<Order> {
        Arc::new(Order::limit(
            OrderId::new(id),
            "TEST",
            Side::Buy,
            Quantity::new(qty),
            Price::new(price),
        ))
    }

    fn limit_sell(id: u64, qty: u64, price: i64) -> Arc<Order> {
        Arc::new(Order::limit(
            OrderId::new(id),
            "TEST",
            Side::Sell,
            Quantity::new(qty),
            Price::new(price),
        ))
    }

    #[test]
    fn test_basic_match_clears_book() {
        let engine = MatchingEngine::new("TEST");

        assert!(engine.submit_order(limit_sell(1, 1, 50000)).is_empty());
        let trades = engine.submit_order(limit_buy(2, 1, 50000));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_order_id, OrderId::new(2));
        assert_eq!(trades[0].sell_order_id, OrderId::new(1));
        assert_eq!(trades[0].price, Price::new(50000));
        assert!(engine.is_empty());
        assert_eq!(engine.last_trade_price(), Some(Price::new(50000)));
    }

    #[test]
    fn test_trade_ids_keyed_by_side_for_sell_aggressor() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_buy(1, 2, 100));

        let trades = engine.submit_order(limit_sell(2, 2, 100));
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].buy_order_id, OrderId::new(1));
        assert_eq!(trades[0].sell_order_id, OrderId::new(2));
    }

    #[test]
    fn test_symbol_mismatch_rejected() {
        let engine = MatchingEngine::new("TEST");
        let order = Arc::new(Order::limit(
            OrderId::new(1),
            "OTHER",
            Side::Buy,
            Quantity::new(1),
            Price::new(100),
        ));

        assert!(engine.submit_order(Arc::clone(&order)).is_empty());
        assert_eq!(order.status(), OrderStatus::Rejected);
        assert!(engine.get_order(OrderId::new(1)).is_none());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_rejected_order_never_touches_book() {
        let engine = MatchingEngine::new("TEST");
        let bad = Arc::new(Order::limit(
            OrderId::new(1),
            "TEST",
            Side::Buy,
            Quantity::ZERO,
            Price::new(100),
        ));

        assert!(engine.submit_order(bad).is_empty());
        assert!(engine.is_empty());
        assert!(engine.get_order(OrderId::new(1)).is_none());
    }

    #[test]
    fn test_market_order_with_no_liquidity_cancels() {
        let engine = MatchingEngine::new("TEST");
        let market = Arc::new(Order::market(
            OrderId::new(1),
            "TEST",
            Side::Buy,
            Quantity::new(5),
        ));

        let trades = engine.submit_order(Arc::clone(&market));
        assert!(trades.is_empty());
        assert_eq!(market.status(), OrderStatus::Cancelled);
        assert_eq!(market.filled_quantity(), Quantity::ZERO);
        assert!(engine.get_order(OrderId::new(1)).is_none());
    }

    #[test]
    fn test_market_partial_fill_cancels_remainder() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_sell(1, 3, 103));

        let market = Arc::new(Order::market(
            OrderId::new(2),
            "TEST",
            Side::Buy,
            Quantity::new(5),
        ));
        let trades = engine.submit_order(Arc::clone(&market));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::new(3));
        assert_eq!(market.filled_quantity(), Quantity::new(3));
        assert_eq!(market.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_fill_and_kill_never_rests() {
        let engine = MatchingEngine::new("TEST");

        let fak = Arc::new(
            Order::limit(
                OrderId::new(1),
                "TEST",
                Side::Buy,
                Quantity::new(5),
                Price::new(100),
            )
            .with_time_in_force(TimeInForce::FillAndKill),
        );

        let trades = engine.submit_order(Arc::clone(&fak));
        assert!(trades.is_empty());
        assert_eq!(fak.status(), OrderStatus::Cancelled);
        assert!(engine.is_empty());
        assert_eq!(engine.best_bid(), None);
    }

    #[test]
    fn test_fill_and_kill_partial_cancels_remainder() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_sell(1, 2, 100));

        let fak = Arc::new(
            Order::limit(
                OrderId::new(2),
                "TEST",
                Side::Buy,
                Quantity::new(5),
                Price::new(100),
            )
            .with_time_in_force(TimeInForce::FillAndKill),
        );

        let trades = engine.submit_order(Arc::clone(&fak));
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::new(2));
        assert_eq!(fak.status(), OrderStatus::Cancelled);
        assert_eq!(engine.best_bid(), None);
    }

    #[test]
    fn test_cancel_unknown_id() {
        let engine = MatchingEngine::new("TEST");
        assert!(!engine.cancel_order(OrderId::new(42)));
    }

    #[test]
    fn test_cancel_twice_returns_false() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_buy(1, 10, 100));

        assert!(engine.cancel_order(OrderId::new(1)));
        assert!(!engine.cancel_order(OrderId::new(1)));
    }

    #[test]
    fn test_cancel_pending_stop_removes_registry_entry() {
        let engine = MatchingEngine::new("TEST");
        let stop = Arc::new(Order::stop(
            OrderId::new(1),
            "TEST",
            Side::Buy,
            Quantity::new(3),
            Price::new(103),
        ));

        engine.submit_order(Arc::clone(&stop));
        assert_eq!(engine.pending_stop_count(), 1);

        assert!(engine.cancel_order(OrderId::new(1)));
        assert_eq!(engine.pending_stop_count(), 0);
        assert_eq!(stop.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_modify_unknown_or_pending_stop_fails() {
        let engine = MatchingEngine::new("TEST");
        assert!(!engine.modify_order(
            OrderId::new(9),
            Quantity::new(1),
            Price::new(1),
            Price::ZERO
        ));

        let stop = Arc::new(Order::stop(
            OrderId::new(1),
            "TEST",
            Side::Buy,
            Quantity::new(3),
            Price::new(103),
        ));
        engine.submit_order(stop);
        assert!(!engine.modify_order(
            OrderId::new(1),
            Quantity::new(5),
            Price::ZERO,
            Price::new(104)
        ));
        assert_eq!(engine.pending_stop_count(), 1);
    }

    #[test]
    fn test_modify_moves_price_level() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_buy(1, 10, 100));

        assert!(engine.modify_order(
            OrderId::new(1),
            Quantity::new(15),
            Price::new(102),
            Price::ZERO
        ));

        assert_eq!(engine.volume_at(Side::Buy, Price::new(100)), Quantity::ZERO);
        assert_eq!(
            engine.volume_at(Side::Buy, Price::new(102)),
            Quantity::new(15)
        );
        assert_eq!(engine.best_bid(), Some(Price::new(102)));
    }

    #[test]
    fn test_failed_modify_leaves_book_position() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_sell(1, 4, 105));
        engine.submit_order(limit_sell(2, 4, 105));

        // Invalid price: validation fails before the book is touched.
        assert!(!engine.modify_order(
            OrderId::new(1),
            Quantity::new(4),
            Price::ZERO,
            Price::ZERO
        ));

        // Order 1 must still be at the front of the 105 level.
        let trades = engine.submit_order(Arc::new(Order::market(
            OrderId::new(3),
            "TEST",
            Side::Buy,
            Quantity::new(4),
        )));
        assert_eq!(trades[0].sell_order_id, OrderId::new(1));
    }

    #[test]
    fn test_snapshot_and_derived_prices() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_buy(1, 1, 100));
        engine.submit_order(limit_buy(2, 2, 98));
        engine.submit_order(limit_sell(3, 1, 104));

        let snapshot = engine.get_snapshot(10);
        assert_eq!(snapshot.symbol, "TEST");
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.asks.len(), 1);
        assert_eq!(snapshot.best_bid(), Some(Price::new(100)));
        assert_eq!(snapshot.best_ask(), Some(Price::new(104)));
        assert_eq!(engine.spread(), Some(Price::new(4)));
        assert_eq!(engine.mid_price(), Some(Price::new(102)));
    }

    #[test]
    fn test_get_order_returns_live_orders_only() {
        let engine = MatchingEngine::new("TEST");
        engine.submit_order(limit_buy(1, 5, 100));
        assert!(engine.get_order(OrderId::new(1)).is_some());

        engine.submit_order(limit_sell(2, 5, 100));

        // Both sides filled: handles are dropped by the engine.
        assert!(engine.get_order(OrderId::new(1)).is_none());
        assert!(engine.get_order(OrderId::new(2)).is_none());
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let engine = MatchingEngine::new("TEST");
        let first = limit_buy(1, 1, 90);
        let second = limit_buy(2, 1, 91);
        engine.submit_order(Arc::clone(&first));
        engine.submit_order(Arc::clone(&second));
        assert!(first.sequence_number() < second.sequence_number());
    }
}
