//! Opponent selection for newly rated items
//!
//! A comparison between two similarly rated items is the most informative
//! one (the expected score is close to 0.5), so the selector pairs a new
//! item with the existing item whose rating is nearest to its own.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::ItemCollection;
use crate::types::{Item, ItemId};
use crate::utils::rating_difference;

/// Configuration for opponent selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Skip candidates further away than this. `None` considers every item.
    pub max_rating_difference: Option<f64>,
}

/// Trait for opponent selection strategies
pub trait OpponentSelector: Send + Sync {
    /// Pick the item `new_item` should be compared with next.
    ///
    /// `new_item` itself is never returned. `None` means there is no
    /// suitable opponent and no comparison should take place.
    fn select_opponent(&self, collection: &ItemCollection, new_item: ItemId) -> Option<ItemId>;

    /// Check if a candidate may be compared with the new item at all
    fn is_eligible(&self, new_item: &Item, candidate: &Item) -> bool;
}

/// Picks the closest-rated item, ties going to the earliest inserted
#[derive(Debug, Clone, Default)]
pub struct ClosestRatingSelector {
    config: SelectorConfig,
}

impl ClosestRatingSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SelectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }
}

impl OpponentSelector for ClosestRatingSelector {
    fn select_opponent(&self, collection: &ItemCollection, new_item: ItemId) -> Option<ItemId> {
        let new = collection.get(new_item)?;
        let mut best: Option<(ItemId, f64)> = None;

        for candidate in collection.iter() {
            if !self.is_eligible(new, candidate) {
                continue;
            }

            let gap = rating_difference(new.rating, candidate.rating);

            // Strict comparison keeps the earliest item on ties.
            match best {
                Some((_, best_gap)) if gap >= best_gap => {}
                _ => best = Some((candidate.id, gap)),
            }
        }

        if let Some((opponent, gap)) = best {
            debug!(
                "Selected opponent {} for '{}' (rating gap {:.1})",
                opponent, new.title, gap
            );
        }

        best.map(|(id, _)| id)
    }

    fn is_eligible(&self, new_item: &Item, candidate: &Item) -> bool {
        if candidate.id == new_item.id {
            return false;
        }

        match self.config.max_rating_difference {
            Some(max) => rating_difference(new_item.rating, candidate.rating) <= max,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn create_test_item(title: &str, rating: f64) -> Item {
        let mut item = Item::new(title, Category::Okay);
        item.rating = rating;
        item
    }

    fn collection_with(ratings: &[f64]) -> ItemCollection {
        let mut collection = ItemCollection::new();
        for (i, &rating) in ratings.iter().enumerate() {
            collection.insert(create_test_item(&format!("item{}", i), rating));
        }
        collection
    }

    #[test]
    fn test_empty_collection_has_no_opponent() {
        let selector = ClosestRatingSelector::new();
        let mut collection = ItemCollection::new();
        let new_id = collection.insert(create_test_item("new", 1400.0));

        assert!(selector.select_opponent(&collection, new_id).is_none());
    }

    #[test]
    fn test_unknown_new_item() {
        let selector = ClosestRatingSelector::new();
        let collection = collection_with(&[1400.0]);

        assert!(selector
            .select_opponent(&collection, crate::utils::generate_item_id())
            .is_none());
    }

    #[test]
    fn test_closest_rating_with_tie_goes_first() {
        let selector = ClosestRatingSelector::new();
        let mut collection = collection_with(&[1200.0, 1380.0, 1420.0, 1600.0]);
        let new_id = collection.insert(create_test_item("new", 1400.0));

        let opponent = selector.select_opponent(&collection, new_id).unwrap();
        let opponent = collection.get(opponent).unwrap();

        assert_eq!(opponent.rating, 1380.0);
        assert_eq!(opponent.title, "item1");
    }

    #[test]
    fn test_tie_order_follows_insertion() {
        let selector = ClosestRatingSelector::new();
        let mut collection = collection_with(&[1420.0, 1380.0]);
        let new_id = collection.insert(create_test_item("new", 1400.0));

        let opponent = selector.select_opponent(&collection, new_id).unwrap();
        assert_eq!(collection.get(opponent).unwrap().rating, 1420.0);
    }

    #[test]
    fn test_new_item_position_does_not_matter() {
        let selector = ClosestRatingSelector::new();
        let mut collection = ItemCollection::new();
        let new_id = collection.insert(create_test_item("new", 1500.0));
        collection.insert(create_test_item("far", 1100.0));
        let near = collection.insert(create_test_item("near", 1490.0));

        assert_eq!(selector.select_opponent(&collection, new_id), Some(near));
    }

    #[test]
    fn test_max_rating_difference() {
        let selector = ClosestRatingSelector::with_config(SelectorConfig {
            max_rating_difference: Some(100.0),
        });
        let mut collection = collection_with(&[1100.0, 1700.0]);
        let new_id = collection.insert(create_test_item("new", 1400.0));

        assert!(selector.select_opponent(&collection, new_id).is_none());

        let near = collection.insert(create_test_item("near", 1350.0));
        assert_eq!(selector.select_opponent(&collection, new_id), Some(near));
    }

    #[test]
    fn test_is_eligible_excludes_self() {
        let selector = ClosestRatingSelector::new();
        let item = create_test_item("self", 1400.0);
        let other = create_test_item("other", 3000.0);

        assert!(!selector.is_eligible(&item, &item));
        assert!(selector.is_eligible(&item, &other));
    }
}
