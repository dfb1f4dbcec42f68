//! Caller-owned collection of ranked items
//!
//! Items live in an arena in insertion order and are addressed by their
//! stable [`ItemId`]. The rating engine never holds on to items; it gets
//! exclusive access to exactly two of them through [`ItemCollection::pair_mut`]
//! for the duration of one update.

use std::collections::HashMap;
use tracing::warn;

use crate::types::{Item, ItemId};
use crate::utils::generate_item_id;

#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from loaded records, keeping their order.
    ///
    /// Records that share an id (hand-edited files, older formats) are given
    /// a fresh one so every item stays addressable.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut collection = Self::with_capacity(items.len());
        for mut item in items {
            if collection.index.contains_key(&item.id) {
                let fresh = generate_item_id();
                warn!(
                    "Duplicate item id {} for '{}', reassigning to {}",
                    item.id, item.title, fresh
                );
                item.id = fresh;
            }
            collection.insert(item);
        }
        collection
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.index.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index.contains_key(&id)
    }

    /// First item with exactly this title
    pub fn find_by_title(&self, title: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.title == title)
    }

    /// Append an item and return its id.
    ///
    /// Panics if an item with the same id is already present.
    pub fn insert(&mut self, item: Item) -> ItemId {
        let id = item.id;
        let prev = self.index.insert(id, self.items.len());
        assert!(prev.is_none(), "Duplicate item ID: {}", id);
        self.items.push(item);
        id
    }

    /// Exclusive access to two distinct items.
    ///
    /// Returns `None` if either id is unknown. Panics if both ids are equal.
    pub fn pair_mut(&mut self, a: ItemId, b: ItemId) -> Option<(&mut Item, &mut Item)> {
        let idx_a = *self.index.get(&a)?;
        let idx_b = *self.index.get(&b)?;
        assert_ne!(idx_a, idx_b, "an item cannot be compared with itself");

        if idx_a < idx_b {
            let (left, right) = self.items.split_at_mut(idx_b);
            Some((&mut left[idx_a], &mut right[0]))
        } else {
            let (left, right) = self.items.split_at_mut(idx_a);
            Some((&mut right[0], &mut left[idx_b]))
        }
    }

    /// Items ordered for display: visible score descending, then category
    /// (good before okay before bad), then rating descending, then
    /// insertion order.
    ///
    /// Neighbouring bands share an endpoint, so the category tiebreak keeps
    /// a "good" item at 8.0 above an "okay" one at 8.0.
    pub fn ranked(&self) -> Vec<&Item> {
        let mut ranked: Vec<&Item> = self.items.iter().collect();
        ranked.sort_by(|a, b| {
            b.visible_score
                .partial_cmp(&a.visible_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.category.rank().cmp(&a.category.rank()))
                .then_with(|| {
                    b.rating
                        .partial_cmp(&a.rating)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        ranked
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }
}
