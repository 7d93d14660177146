// ============================================================================
// Engine Module
// Contains the core matching engine business logic
// ============================================================================

mod builder;
mod matching_engine;

pub use builder::MatchingEngineBuilder;
pub use matching_engine::MatchingEngine;
