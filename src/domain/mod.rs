// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod book;
pub mod order;
pub mod stop_registry;
pub mod trade;

pub use book::{BookSide, BookSnapshot, PriceLevel};
pub use order::{Order, OrderId, OrderType, Side, TimeInForce};
pub use stop_registry::StopRegistry;
pub use trade::Trade;

// Re-export the status state machine
pub use order::status::OrderStatus;
