//! Ranking service coordination
//!
//! `Ranker` is the caller the rating core is written for. It owns the item
//! collection, drives the comparison cycle, and persists the collection
//! after every category assignment and every applied outcome. Storage
//! failures are logged and never undo in-memory work.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::collection::ItemCollection;
use crate::config::AppConfig;
use crate::error::{RankingError, Result};
use crate::matching::{ClosestRatingSelector, OpponentSelector};
use crate::rating::EloRatingEngine;
use crate::service::cycle::{ComparisonCycle, CycleState};
use crate::storage::{ItemStore, JsonFileStore};
use crate::types::{Category, Item, ItemId, OutcomeSummary};

pub struct Ranker {
    collection: ItemCollection,
    store: Arc<dyn ItemStore>,
    engine: EloRatingEngine,
    selector: Arc<dyn OpponentSelector>,
    cycle: ComparisonCycle,
}

impl Ranker {
    /// Create a ranker and load the stored collection.
    ///
    /// An unreadable store is treated as empty. Every loaded record is
    /// normalized by the engine before it enters the collection.
    pub fn new(
        store: Arc<dyn ItemStore>,
        engine: EloRatingEngine,
        selector: Arc<dyn OpponentSelector>,
    ) -> Self {
        let mut items = store.load_items().unwrap_or_else(|e| {
            warn!("Error loading movies, starting with an empty list: {}", e);
            Vec::new()
        });

        let mut repaired = 0;
        for item in items.iter_mut() {
            if engine.normalize_item(item) {
                repaired += 1;
            }
        }
        if repaired > 0 {
            warn!("Repaired {} inconsistent movie records", repaired);
        }

        info!("Ranker initialised with {} movies", items.len());

        Self {
            collection: ItemCollection::from_items(items),
            store,
            engine,
            selector,
            cycle: ComparisonCycle::new(),
        }
    }

    /// Build the production ranker: JSON file store, closest-rating selector
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let engine = EloRatingEngine::new(config.rating.clone())?;
        let store = Arc::new(JsonFileStore::new(config.storage.data_file.clone()));
        let selector = Arc::new(ClosestRatingSelector::with_config(config.matching.clone()));

        Ok(Self::new(store, engine, selector))
    }

    pub fn collection(&self) -> &ItemCollection {
        &self.collection
    }

    pub fn engine(&self) -> &EloRatingEngine {
        &self.engine
    }

    pub fn cycle_state(&self) -> &CycleState {
        self.cycle.state()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.collection.get(id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&Item> {
        self.collection.find_by_title(title)
    }

    /// Items ordered by visible score, best first
    pub fn rankings(&self) -> Vec<&Item> {
        self.collection.ranked()
    }

    /// Start a cycle for a movie picked from search suggestions
    pub fn begin(&mut self, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(RankingError::InvalidState {
                message: "a movie needs a title".to_string(),
            }
            .into());
        }
        if self.collection.find_by_title(title).is_some() {
            return Err(RankingError::DuplicateTitle {
                title: title.to_string(),
            }
            .into());
        }

        self.cycle.start(title);
        Ok(())
    }

    /// Rate the pending movie and pick its first opponent.
    ///
    /// The new item is stored immediately. Returns the opponent's id, or
    /// `None` when nothing suitable exists and the cycle is already over.
    pub fn assign_category(&mut self, category: Category) -> Result<Option<ItemId>> {
        let title = self
            .cycle
            .pending_title()
            .ok_or_else(|| RankingError::InvalidState {
                message: format!("no movie waiting for a category ({})", self.cycle.state()),
            })?
            .to_string();

        let item = self.engine.create_item(title, category);
        info!(
            "Rated '{}' as {} (rating {:.0}, score {:.1})",
            item.title, category, item.rating, item.visible_score
        );

        let item_id = self.collection.insert(item);
        self.cycle.category_assigned(item_id)?;
        self.persist();

        match self.selector.select_opponent(&self.collection, item_id) {
            Some(opponent) => {
                self.cycle.opponent_selected(opponent)?;
                Ok(Some(opponent))
            }
            None => {
                info!("No suitable movie for comparison");
                self.cycle.finish()?;
                Ok(None)
            }
        }
    }

    /// `(new item, opponent)` waiting for the human's choice
    pub fn pending_comparison(&self) -> Option<(&Item, &Item)> {
        let (item, opponent) = self.cycle.pending_comparison()?;
        Some((self.collection.get(item)?, self.collection.get(opponent)?))
    }

    /// Apply the human's choice for the pending comparison
    pub fn report_outcome(&mut self, new_item_wins: bool) -> Result<OutcomeSummary> {
        let (item, opponent) = self.cycle.outcome_reported(new_item_wins)?;
        match self.apply(item, opponent, new_item_wins) {
            Ok(summary) => {
                self.cycle.finish()?;
                Ok(summary)
            }
            Err(e) => {
                self.cycle.reset();
                Err(e)
            }
        }
    }

    /// Add a movie and run the cycle up to opponent selection
    pub fn add_item(&mut self, title: &str, category: Category) -> Result<Option<ItemId>> {
        self.begin(title)?;
        self.assign_category(category)
    }

    /// Compare two stored movies outside the add cycle
    pub fn compare(&mut self, a: ItemId, b: ItemId, a_wins: bool) -> Result<OutcomeSummary> {
        if a == b {
            return Err(RankingError::InvalidState {
                message: "a movie cannot be compared with itself".to_string(),
            }
            .into());
        }
        self.apply(a, b, a_wins)
    }

    /// Delete every movie. The in-memory list is only cleared when the
    /// store deletion succeeds.
    pub fn delete_all(&mut self) -> bool {
        match self.store.delete_items() {
            Ok(_) => {
                let removed = self.collection.len();
                self.collection.clear();
                self.cycle.reset();
                info!("Deleted all {} movies", removed);
                true
            }
            Err(e) => {
                error!("Error deleting movies: {}", e);
                false
            }
        }
    }

    fn apply(&mut self, a: ItemId, b: ItemId, a_wins: bool) -> Result<OutcomeSummary> {
        let missing = [a, b].into_iter().find(|id| !self.collection.contains(*id));
        if let Some(id) = missing {
            return Err(RankingError::ItemNotFound {
                item_id: id.to_string(),
            }
            .into());
        }

        let (item_a, item_b) = self
            .collection
            .pair_mut(a, b)
            .ok_or_else(|| RankingError::ItemNotFound {
                item_id: format!("{} / {}", a, b),
            })?;
        let summary = self.engine.apply_outcome(item_a, item_b, a_wins);

        let winner = if a_wins { &item_a.title } else { &item_b.title };
        info!(
            "'{}' wins the comparison ({:+.1} / {:+.1})",
            winner,
            summary.winner.delta(),
            summary.loser.delta()
        );

        self.persist();
        Ok(summary)
    }

    fn persist(&self) {
        if let Err(e) = self.store.save_items(self.collection.items()) {
            error!("Error saving movies: {}", e);
        }
    }
}
