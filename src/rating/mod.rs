//! Elo rating engine
//!
//! Computes rating updates for pairwise comparisons and the category-banded
//! visible score shown to users.

pub mod elo;

// Re-export commonly used items
pub use elo::{
    expected_score, score_band, seed_rating, visible_score_for, EloRatingEngine, DEFAULT_RATING,
    RATING_SCALE,
};
