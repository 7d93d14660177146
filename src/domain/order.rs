// ============================================================================
// Order Domain Model
// ============================================================================

use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

/// Caller-assigned order identifier, unique per venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(u64);

impl OrderId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderType {
    /// Execute at the best available price, never rests.
    Market,
    /// Execute at the limit price or better, remainder rests.
    Limit,
    /// Becomes a market order once the last trade price reaches the stop.
    Stop,
    /// Becomes a limit order once the last trade price reaches the stop.
    StopLimit,
}

impl OrderType {
    pub fn uses_limit_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }

    pub fn uses_stop_price(&self) -> bool {
        matches!(self, OrderType::Stop | OrderType::StopLimit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeInForce {
    /// Remainder rests in the book until filled or cancelled.
    #[default]
    GoodTillCancel,
    /// Remainder is cancelled instead of rested.
    FillAndKill,
}

// ============================================================================
// Order State Machine
// ============================================================================

pub mod status {
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[repr(u8)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderStatus {
        /// Accepted but not yet live: a stop order waiting on its trigger.
        New = 0,
        Active = 1,
        PartiallyFilled = 2,
        Filled = 3,
        Cancelled = 4,
        Rejected = 5,
    }

    impl OrderStatus {
        pub fn from_u8(val: u8) -> Self {
            match val {
                0 => OrderStatus::New,
                1 => OrderStatus::Active,
                2 => OrderStatus::PartiallyFilled,
                3 => OrderStatus::Filled,
                4 => OrderStatus::Cancelled,
                _ => OrderStatus::Rejected,
            }
        }

        pub fn is_terminal(&self) -> bool {
            matches!(
                self,
                OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
            )
        }

        /// New covers untriggered stop orders, which are cancellable while
        /// they wait in the registry.
        pub fn can_be_cancelled(&self) -> bool {
            matches!(
                self,
                OrderStatus::New | OrderStatus::Active | OrderStatus::PartiallyFilled
            )
        }
    }
}

use self::status::OrderStatus;

// ============================================================================
// Order Entity
// ============================================================================

/// An order record shared between the order index, a side book and the stop
/// registry. Mutable fields are atomics so a reader outside the engine lock
/// observes a consistent value for each field; the engine serializes all
/// mutation.
#[derive(Debug)]
pub struct Order {
    id: OrderId,
    symbol: Arc<String>,
    side: Side,
    order_type: OrderType,
    time_in_force: TimeInForce,
    created_at: DateTime<Utc>,

    quantity: AtomicU64,
    filled_quantity: AtomicU64,
    price: AtomicI64,
    stop_price: AtomicI64,
    status: AtomicU8,
    triggered: AtomicBool,
    sequence_number: AtomicU64,
}

impl Order {
    /// Full constructor. Validation failures leave the order `Rejected`; all
    /// further operations on a rejected order are no-ops returning false.
    pub fn new(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        time_in_force: TimeInForce,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> Self {
        let status = Self::validate(order_type, quantity, price, stop_price);

        Self {
            id,
            symbol: Arc::new(symbol.into()),
            side,
            order_type,
            time_in_force,
            created_at: Utc::now(),
            quantity: AtomicU64::new(quantity.value()),
            filled_quantity: AtomicU64::new(0),
            price: AtomicI64::new(price.value()),
            stop_price: AtomicI64::new(stop_price.value()),
            status: AtomicU8::new(status as u8),
            triggered: AtomicBool::new(false),
            sequence_number: AtomicU64::new(0),
        }
    }

    pub fn market(id: OrderId, symbol: impl Into<String>, side: Side, quantity: Quantity) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Market,
            TimeInForce::GoodTillCancel,
            quantity,
            Price::ZERO,
            Price::ZERO,
        )
    }

    pub fn limit(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Limit,
            TimeInForce::GoodTillCancel,
            quantity,
            price,
            Price::ZERO,
        )
    }

    pub fn stop(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        quantity: Quantity,
        stop_price: Price,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::Stop,
            TimeInForce::GoodTillCancel,
            quantity,
            Price::ZERO,
            stop_price,
        )
    }

    pub fn stop_limit(
        id: OrderId,
        symbol: impl Into<String>,
        side: Side,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> Self {
        Self::new(
            id,
            symbol,
            side,
            OrderType::StopLimit,
            TimeInForce::GoodTillCancel,
            quantity,
            price,
            stop_price,
        )
    }

    /// Builder step for the non-default time in force.
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    fn validate(
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> OrderStatus {
        if quantity.is_zero() {
            return OrderStatus::Rejected;
        }
        if order_type.uses_limit_price() && price.value() <= 0 {
            return OrderStatus::Rejected;
        }
        if order_type.uses_stop_price() && stop_price.value() <= 0 {
            return OrderStatus::Rejected;
        }

        // Stop orders wait in the registry; everything else is live at once.
        if order_type.uses_stop_price() {
            OrderStatus::New
        } else {
            OrderStatus::Active
        }
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn quantity(&self) -> Quantity {
        Quantity::new(self.quantity.load(Ordering::Acquire))
    }

    pub fn filled_quantity(&self) -> Quantity {
        Quantity::new(self.filled_quantity.load(Ordering::Acquire))
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity() - self.filled_quantity()
    }

    /// Limit price; `Price::ZERO` when the order type carries none.
    pub fn price(&self) -> Price {
        Price::new(self.price.load(Ordering::Acquire))
    }

    /// Stop price; `Price::ZERO` when the order type carries none.
    pub fn stop_price(&self) -> Price {
        Price::new(self.stop_price.load(Ordering::Acquire))
    }

    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number.load(Ordering::Acquire)
    }

    // ========================================================================
    // Status checks
    // ========================================================================

    pub fn is_active(&self) -> bool {
        matches!(
            self.status(),
            OrderStatus::Active | OrderStatus::PartiallyFilled
        )
    }

    pub fn is_filled(&self) -> bool {
        self.status() == OrderStatus::Filled
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == OrderStatus::Cancelled
    }

    pub fn is_rejected(&self) -> bool {
        self.status() == OrderStatus::Rejected
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    pub fn is_stop_order(&self) -> bool {
        self.order_type.uses_stop_price()
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::Acquire)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Fill `quantity` of this order. Fails when the order is not live or the
    /// quantity exceeds what remains. The execution price is not stored here;
    /// it flows into the `Trade` record.
    pub fn try_fill(&self, quantity: Quantity) -> bool {
        if !self.is_active() {
            return false;
        }
        if quantity > self.remaining_quantity() {
            return false;
        }

        let filled = self
            .filled_quantity
            .fetch_add(quantity.value(), Ordering::AcqRel)
            + quantity.value();

        if filled == self.quantity.load(Ordering::Acquire) {
            self.set_status(OrderStatus::Filled);
        } else {
            self.set_status(OrderStatus::PartiallyFilled);
        }

        true
    }

    /// Cancel this order. No-op on filled, rejected or already cancelled
    /// orders.
    pub fn try_cancel(&self) -> bool {
        if !self.status().can_be_cancelled() {
            return false;
        }
        self.set_status(OrderStatus::Cancelled);
        true
    }

    /// Replace quantity and prices. Fails when the order is not live, the new
    /// quantity is zero or below the filled quantity. The limit price is only
    /// updated for types that carry one, the stop price likewise.
    pub fn modify(&self, new_quantity: Quantity, new_price: Price, new_stop_price: Price) -> bool {
        if !self.is_active() {
            return false;
        }
        if new_quantity.is_zero() || new_quantity < self.filled_quantity() {
            return false;
        }

        self.quantity.store(new_quantity.value(), Ordering::Release);
        if self.order_type.uses_limit_price() {
            self.price.store(new_price.value(), Ordering::Release);
        }
        if self.order_type.uses_stop_price() {
            self.stop_price
                .store(new_stop_price.value(), Ordering::Release);
        }

        // Shrinking to exactly the filled quantity completes the order.
        if new_quantity == self.filled_quantity() {
            self.set_status(OrderStatus::Filled);
        }

        true
    }

    /// Check whether the last trade price arms this stop order: a buy stop
    /// fires at or above its stop price, a sell stop at or below. Returns
    /// false for non-stop orders and on every call after the first trigger.
    pub fn check_stop_trigger(&self, last_trade_price: Price) -> bool {
        if !self.is_stop_order() || self.is_triggered() {
            return false;
        }

        let fires = match self.side {
            Side::Buy => last_trade_price >= self.stop_price(),
            Side::Sell => last_trade_price <= self.stop_price(),
        };

        if fires {
            self.triggered.store(true, Ordering::Release);
            // Promotion to the live matching path.
            if self.status() == OrderStatus::New {
                self.set_status(OrderStatus::Active);
            }
        }

        fires
    }

    pub(crate) fn reject(&self) {
        self.set_status(OrderStatus::Rejected);
    }

    pub(crate) fn set_sequence_number(&self, seq: u64) {
        self.sequence_number.store(seq, Ordering::Release);
    }

    fn set_status(&self, status: OrderStatus) {
        self.status.store(status as u8, Ordering::Release);
    }
}

impl Clone for Order {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            symbol: Arc::clone(&self.symbol),
            side: self.side,
            order_type: self.order_type,
            time_in_force: self.time_in_force,
            created_at: self.created_at,
            quantity: AtomicU64::new(self.quantity.load(Ordering::Acquire)),
            filled_quantity: AtomicU64::new(self.filled_quantity.load(Ordering::Acquire)),
            price: AtomicI64::new(self.price.load(Ordering::Acquire)),
            stop_price: AtomicI64::new(self.stop_price.load(Ordering::Acquire)),
            status: AtomicU8::new(self.status.load(Ordering::Acquire)),
            triggered: AtomicBool::new(self.triggered.load(Ordering::Acquire)),
            sequence_number: AtomicU64::new(self.sequence_number.load(Ordering::Acquire)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_order_creation() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::new(50),
        );

        assert_eq!(order.id(), OrderId::new(1));
        assert_eq!(order.symbol(), "AAPL");
        assert_eq!(order.side(), Side::Buy);
        assert_eq!(order.order_type(), OrderType::Limit);
        assert_eq!(order.quantity(), Quantity::new(100));
        assert_eq!(order.filled_quantity(), Quantity::ZERO);
        assert_eq!(order.remaining_quantity(), Quantity::new(100));
        assert_eq!(order.price(), Price::new(50));
        assert_eq!(order.status(), OrderStatus::Active);
        assert_eq!(order.time_in_force(), TimeInForce::GoodTillCancel);
    }

    #[test]
    fn test_stop_orders_start_pending() {
        let stop = Order::stop(
            OrderId::new(2),
            "AAPL",
            Side::Sell,
            Quantity::new(10),
            Price::new(95),
        );
        assert_eq!(stop.status(), OrderStatus::New);
        assert!(!stop.is_triggered());

        let stop_limit = Order::stop_limit(
            OrderId::new(3),
            "AAPL",
            Side::Buy,
            Quantity::new(10),
            Price::new(107),
            Price::new(105),
        );
        assert_eq!(stop_limit.status(), OrderStatus::New);
    }

    #[test]
    fn test_invalid_orders_rejected() {
        let zero_qty = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::ZERO,
            Price::new(50),
        );
        assert_eq!(zero_qty.status(), OrderStatus::Rejected);

        let zero_price = Order::limit(
            OrderId::new(2),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::ZERO,
        );
        assert_eq!(zero_price.status(), OrderStatus::Rejected);

        let zero_stop = Order::stop(
            OrderId::new(3),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::ZERO,
        );
        assert_eq!(zero_stop.status(), OrderStatus::Rejected);

        // Rejected orders refuse every operation.
        assert!(!zero_qty.try_fill(Quantity::new(1)));
        assert!(!zero_qty.try_cancel());
        assert!(!zero_qty.modify(Quantity::new(1), Price::new(1), Price::ZERO));
    }

    #[test]
    fn test_fill_transitions() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::new(50),
        );

        assert!(order.try_fill(Quantity::new(30)));
        assert_eq!(order.filled_quantity(), Quantity::new(30));
        assert_eq!(order.remaining_quantity(), Quantity::new(70));
        assert_eq!(order.status(), OrderStatus::PartiallyFilled);

        assert!(order.try_fill(Quantity::new(70)));
        assert_eq!(order.remaining_quantity(), Quantity::ZERO);
        assert_eq!(order.status(), OrderStatus::Filled);

        // Cannot fill beyond the remaining quantity.
        assert!(!order.try_fill(Quantity::new(10)));
        assert_eq!(order.filled_quantity(), Quantity::new(100));
    }

    #[test]
    fn test_overfill_rejected() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(5),
            Price::new(50),
        );
        assert!(!order.try_fill(Quantity::new(10)));
        assert_eq!(order.filled_quantity(), Quantity::ZERO);
        assert_eq!(order.status(), OrderStatus::Active);
    }

    #[test]
    fn test_cancel() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::new(50),
        );
        assert!(order.is_active());
        assert!(order.try_cancel());
        assert!(order.is_cancelled());
        assert!(!order.try_cancel());
    }

    #[test]
    fn test_cancel_pending_stop() {
        let stop = Order::stop(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(10),
            Price::new(105),
        );
        assert_eq!(stop.status(), OrderStatus::New);
        assert!(stop.try_cancel());
        assert!(stop.is_cancelled());
    }

    #[test]
    fn test_modify_rules() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::new(50),
        );

        assert!(order.modify(Quantity::new(150), Price::new(55), Price::ZERO));
        assert_eq!(order.quantity(), Quantity::new(150));
        assert_eq!(order.price(), Price::new(55));

        order.try_fill(Quantity::new(50));

        // Cannot reduce below the filled quantity.
        assert!(!order.modify(Quantity::new(40), Price::new(55), Price::ZERO));

        // Shrinking exactly to the filled quantity completes the order.
        assert!(order.modify(Quantity::new(50), Price::new(60), Price::ZERO));
        assert_eq!(order.quantity(), Quantity::new(50));
        assert_eq!(order.price(), Price::new(60));
        assert_eq!(order.status(), OrderStatus::Filled);

        assert!(!order.modify(Quantity::new(70), Price::new(65), Price::ZERO));
    }

    #[test]
    fn test_modify_does_not_touch_unused_prices() {
        let order = Order::market(OrderId::new(1), "AAPL", Side::Buy, Quantity::new(10));
        assert!(order.modify(Quantity::new(20), Price::new(99), Price::new(98)));
        assert_eq!(order.price(), Price::ZERO);
        assert_eq!(order.stop_price(), Price::ZERO);
    }

    #[test]
    fn test_stop_trigger_buy_and_sell() {
        let buy_stop = Order::stop(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(100),
            Price::new(105),
        );
        assert!(!buy_stop.check_stop_trigger(Price::new(100)));
        assert!(!buy_stop.is_triggered());
        assert!(buy_stop.check_stop_trigger(Price::new(105)));
        assert!(buy_stop.is_triggered());
        assert_eq!(buy_stop.status(), OrderStatus::Active);
        // Idempotent after the first trigger.
        assert!(!buy_stop.check_stop_trigger(Price::new(110)));

        let sell_stop = Order::stop(
            OrderId::new(2),
            "AAPL",
            Side::Sell,
            Quantity::new(100),
            Price::new(95),
        );
        assert!(!sell_stop.check_stop_trigger(Price::new(100)));
        assert!(sell_stop.check_stop_trigger(Price::new(95)));
        assert!(!sell_stop.check_stop_trigger(Price::new(90)));
    }

    #[test]
    fn test_non_stop_orders_never_trigger() {
        let limit = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(10),
            Price::new(100),
        );
        assert!(!limit.check_stop_trigger(Price::new(100)));
        assert!(!limit.is_triggered());
    }

    #[test]
    fn test_clone_snapshots_state() {
        let order = Order::limit(
            OrderId::new(1),
            "AAPL",
            Side::Buy,
            Quantity::new(10),
            Price::new(100),
        );
        order.try_fill(Quantity::new(4));

        let snapshot = order.clone();
        order.try_fill(Quantity::new(6));

        assert_eq!(snapshot.filled_quantity(), Quantity::new(4));
        assert_eq!(snapshot.status(), OrderStatus::PartiallyFilled);
        assert!(order.is_filled());
    }
}
