// ============================================================================
// Stop Order Registry
// ============================================================================

use crate::domain::{Order, OrderId};
use crate::numeric::Price;
use std::collections::VecDeque;
use std::sync::Arc;

/// Untriggered stop and stop-limit orders in submission order. An order lives
/// here from submission until the triggering scan promotes it onto the live
/// matching path, or until it is cancelled.
#[derive(Debug, Default)]
pub struct StopRegistry {
    orders: VecDeque<Arc<Order>>,
}

impl StopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&mut self, order: Arc<Order>) {
        self.orders.push_back(order);
    }

    pub fn remove(&mut self, order_id: OrderId) -> Option<Arc<Order>> {
        let position = self.orders.iter().position(|o| o.id() == order_id)?;
        self.orders.remove(position)
    }

    /// Scan every entry against the new last trade price, removing and
    /// returning the ones that fire. The returned batch preserves submission
    /// order, which fixes relative priority among simultaneous triggers.
    pub fn drain_triggered(&mut self, last_trade_price: Price) -> Vec<Arc<Order>> {
        let mut triggered = Vec::new();
        self.orders.retain(|order| {
            if order.check_stop_trigger(last_trade_price) {
                triggered.push(Arc::clone(order));
                false
            } else {
                true
            }
        });
        triggered
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
