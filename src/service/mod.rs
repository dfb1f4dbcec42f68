//! Service layer for the movie ranker
//!
//! This module contains the ranking service that owns the collection and
//! drives the comparison cycle on behalf of a front end.

pub mod app;
pub mod cycle;

pub use app::Ranker;
pub use cycle::{ComparisonCycle, CycleState};
