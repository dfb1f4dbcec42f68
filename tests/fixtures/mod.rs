//! Test fixtures and mock implementations for integration testing

use movie_ranker::error::Result;
use movie_ranker::rating::EloRatingEngine;
use movie_ranker::storage::{ItemStore, JsonFileStore};
use movie_ranker::{Category, ClosestRatingSelector, Item, RankingError, Ranker};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Store whose every operation fails, counting the attempts
#[derive(Debug, Default)]
pub struct FailingItemStore {
    save_attempts: AtomicUsize,
}

impl FailingItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }

    fn failure(action: &str) -> anyhow::Error {
        RankingError::Storage {
            message: format!("simulated {} failure", action),
        }
        .into()
    }
}

impl ItemStore for FailingItemStore {
    fn load_items(&self) -> Result<Vec<Item>> {
        Err(Self::failure("load"))
    }

    fn save_items(&self, _items: &[Item]) -> Result<()> {
        self.save_attempts.fetch_add(1, Ordering::SeqCst);
        Err(Self::failure("save"))
    }

    fn delete_items(&self) -> Result<bool> {
        Err(Self::failure("delete"))
    }
}

/// Ranker backed by a JSON file in a fresh temporary directory.
///
/// The directory lives as long as the returned `TempDir`.
pub fn create_file_ranker() -> (Ranker, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let ranker = open_file_ranker(&dir);
    (ranker, dir)
}

/// Open (or reopen) the ranker stored in `dir`
pub fn open_file_ranker(dir: &TempDir) -> Ranker {
    let store = Arc::new(JsonFileStore::new(dir.path().join("movies.json")));
    Ranker::new(
        store,
        EloRatingEngine::default(),
        Arc::new(ClosestRatingSelector::new()),
    )
}

/// A realistic starting library: (title, category)
pub fn sample_library() -> Vec<(&'static str, Category)> {
    vec![
        ("Heat", Category::Good),
        ("The Matrix", Category::Good),
        ("Speed", Category::Okay),
        ("Twister", Category::Okay),
        ("Waterworld", Category::Bad),
        ("Battlefield Earth", Category::Bad),
    ]
}
