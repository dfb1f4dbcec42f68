//! Utility functions for the movie ranker

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::ItemId;

/// Generate a new unique item ID
pub fn generate_item_id() -> ItemId {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

/// Round to one decimal place, the precision visible scores are shown with
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_unique_ids() {
        let id1 = generate_item_id();
        let id2 = generate_item_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_rating_difference() {
        assert_eq!(rating_difference(1500.0, 1400.0), 100.0);
        assert_eq!(rating_difference(1400.0, 1500.0), 100.0);
        assert_eq!(rating_difference(1500.0, 1500.0), 0.0);
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(6.08), 6.1);
        assert_eq!(round_to_tenth(5.92), 5.9);
        assert_eq!(round_to_tenth(8.5), 8.5);
    }
}
