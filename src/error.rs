//! Error types for the movie ranker
//!
//! The rating core is total and never fails. Errors only arise at the
//! service boundary (lookups by id, storage, configuration), so this module
//! follows the same pattern everywhere: `anyhow` for propagation and a
//! `thiserror` enum for the conditions callers may want to match on.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific ranking scenarios
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("Item not found: {item_id}")]
    ItemNotFound { item_id: String },

    #[error("An item titled '{title}' is already ranked")]
    DuplicateTitle { title: String },

    #[error("Invalid category: {value} (expected good, okay or bad)")]
    InvalidCategory { value: String },

    #[error("Invalid comparison state: {message}")]
    InvalidState { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
