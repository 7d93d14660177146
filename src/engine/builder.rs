// ============================================================================
// Matching Engine Builder
// Creates matching engines with proper configuration
// ============================================================================

use crate::engine::MatchingEngine;
use crate::interfaces::{EventHandler, NoOpEventHandler};
use std::sync::Arc;

/// Builder for creating matching engines with a fluent API
///
/// # Example
/// ```
/// use orderbook_engine::prelude::*;
///
/// let engine = MatchingEngineBuilder::new("BTC-USD")
///     .with_event_handler(std::sync::Arc::new(LoggingEventHandler))
///     .build();
///
/// assert_eq!(engine.symbol(), "BTC-USD");
/// ```
pub struct MatchingEngineBuilder {
    symbol: String,
    event_handler: Arc<dyn EventHandler>,
}

impl MatchingEngineBuilder {
    /// Create a new builder for the specified symbol
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            event_handler: Arc::new(NoOpEventHandler),
        }
    }

    /// Set the event handler receiving order lifecycle and trade events
    pub fn with_event_handler(mut self, event_handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = event_handler;
        self
    }

    /// Build the matching engine
    pub fn build(self) -> MatchingEngine {
        MatchingEngine::with_event_handler(self.symbol, self.event_handler)
    }
}
