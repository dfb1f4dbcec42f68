//! Comparison candidate selection

pub mod selector;

pub use selector::{ClosestRatingSelector, OpponentSelector, SelectorConfig};
