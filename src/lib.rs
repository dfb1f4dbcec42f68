//! Movie Ranker - pairwise movie ranking with an adaptive Elo engine
//!
//! This crate ranks movies from pairwise human comparisons. Ratings move
//! with an Elo update whose K-factor shrinks as a movie gains experience,
//! and each movie's visible score stays inside the band of the category
//! ("good", "okay", "bad") its viewer gave it.

pub mod collection;
pub mod config;
pub mod error;
pub mod matching;
pub mod rating;
pub mod search;
pub mod service;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RankingError, Result};
pub use types::*;

// Re-export key components
pub use collection::ItemCollection;
pub use matching::{ClosestRatingSelector, OpponentSelector};
pub use rating::EloRatingEngine;
pub use service::Ranker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
