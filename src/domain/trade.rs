// ============================================================================
// Trade Domain Model
// ============================================================================

use crate::domain::OrderId;
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An execution between two orders. The buy/sell ids always name the Buy and
/// Sell sides of the trade, independent of which side was the aggressor.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Trade {
    /// Unique trade identifier.
    pub id: Uuid,

    /// Trading symbol.
    pub symbol: String,

    /// Order ID of the Buy side of the execution.
    pub buy_order_id: OrderId,

    /// Order ID of the Sell side of the execution.
    pub sell_order_id: OrderId,

    /// Execution price (the resting order's price).
    pub price: Price,

    /// Executed quantity.
    pub quantity: Quantity,

    /// Trade timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        symbol: String,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol,
            buy_order_id,
            sell_order_id,
            price,
            quantity,
            timestamp: Utc::now(),
        }
    }

    /// Notional value in minor units, widened to avoid overflow on large
    /// tick/lot products.
    pub fn notional_value(&self) -> i128 {
        self.price.value() as i128 * self.quantity.value() as i128
    }
}
