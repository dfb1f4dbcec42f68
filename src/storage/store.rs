//! Item storage interface and implementations
//!
//! The store keeps the whole collection as one durable list. It is only
//! ever used in bulk: load everything at start-up, overwrite everything
//! after each change, delete everything on request.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info};

use crate::error::RankingError;
use crate::types::Item;

/// Trait for item storage operations
pub trait ItemStore: Send + Sync {
    /// Load all items. A store that does not exist yet yields an empty list.
    fn load_items(&self) -> crate::error::Result<Vec<Item>>;

    /// Replace the stored items with `items`
    fn save_items(&self, items: &[Item]) -> crate::error::Result<()>;

    /// Delete every stored item. Returns whether anything was removed.
    fn delete_items(&self) -> crate::error::Result<bool>;
}

/// JSON file storage, one pretty-printed array of item records
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, action: &str, err: impl std::fmt::Display) -> RankingError {
        RankingError::Storage {
            message: format!("Failed to {} {}: {}", action, self.path.display(), err),
        }
    }
}

impl ItemStore for JsonFileStore {
    fn load_items(&self) -> crate::error::Result<Vec<Item>> {
        if !self.path.exists() {
            debug!("No item store at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let data = fs::read_to_string(&self.path).map_err(|e| self.storage_error("read", e))?;
        let items: Vec<Item> =
            serde_json::from_str(&data).map_err(|e| self.storage_error("parse", e))?;

        info!("Loaded {} items from {}", items.len(), self.path.display());
        Ok(items)
    }

    fn save_items(&self, items: &[Item]) -> crate::error::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.storage_error("create directory for", e))?;
        }

        let data =
            serde_json::to_string_pretty(items).map_err(|e| self.storage_error("serialize", e))?;
        fs::write(&self.path, data).map_err(|e| self.storage_error("write", e))?;

        debug!("Saved {} items to {}", items.len(), self.path.display());
        Ok(())
    }

    fn delete_items(&self) -> crate::error::Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }

        fs::remove_file(&self.path).map_err(|e| self.storage_error("delete", e))?;
        info!("Deleted item store {}", self.path.display());
        Ok(true)
    }
}

/// In-memory item storage
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    items: RwLock<Option<Vec<Item>>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `items`
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: RwLock::new(Some(items)),
        }
    }
}

impl ItemStore for InMemoryItemStore {
    fn load_items(&self) -> crate::error::Result<Vec<Item>> {
        let items = self.items.read().map_err(|_| RankingError::Storage {
            message: "Failed to acquire items read lock".to_string(),
        })?;

        Ok(items.clone().unwrap_or_default())
    }

    fn save_items(&self, items: &[Item]) -> crate::error::Result<()> {
        let mut stored = self.items.write().map_err(|_| RankingError::Storage {
            message: "Failed to acquire items write lock".to_string(),
        })?;

        *stored = Some(items.to_vec());
        Ok(())
    }

    fn delete_items(&self) -> crate::error::Result<bool> {
        let mut stored = self.items.write().map_err(|_| RankingError::Storage {
            message: "Failed to acquire items write lock".to_string(),
        })?;

        Ok(stored.take().is_some())
    }
}

/// Mock item storage for testing
#[derive(Debug, Default)]
pub struct MockItemStore {
    inner: InMemoryItemStore,
    save_calls: RwLock<Vec<Vec<Item>>>,
}

impl MockItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get every snapshot passed to `save_items` (for testing)
    pub fn get_save_calls(&self) -> Vec<Vec<Item>> {
        self.save_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Clear recorded save calls (for testing)
    pub fn clear_save_calls(&self) {
        if let Ok(mut calls) = self.save_calls.write() {
            calls.clear();
        }
    }
}

impl ItemStore for MockItemStore {
    fn load_items(&self) -> crate::error::Result<Vec<Item>> {
        self.inner.load_items()
    }

    fn save_items(&self, items: &[Item]) -> crate::error::Result<()> {
        if let Ok(mut calls) = self.save_calls.write() {
            calls.push(items.to_vec());
        }

        self.inner.save_items(items)
    }

    fn delete_items(&self) -> crate::error::Result<bool> {
        self.inner.delete_items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn create_test_item(title: &str, rating: f64) -> Item {
        let mut item = Item::new(title, Category::Good);
        item.rating = rating;
        item.visible_score = 8.5;
        item
    }

    #[test]
    fn test_json_store_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movies.json"));

        assert!(store.load_items().unwrap().is_empty());
        assert!(!store.delete_items().unwrap());
    }

    #[test]
    fn test_json_store_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movies.json"));
        let items = vec![
            create_test_item("Heat", 1500.0),
            create_test_item("Ronin", 1432.5),
        ];

        store.save_items(&items).unwrap();
        let loaded = store.load_items().unwrap();

        assert_eq!(loaded, items);
    }

    #[test]
    fn test_json_store_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movies.json"));

        store
            .save_items(&[create_test_item("Old", 1400.0), create_test_item("Older", 1400.0)])
            .unwrap();
        store.save_items(&[create_test_item("New", 1400.0)]).unwrap();
        store.save_items(&[create_test_item("New", 1400.0)]).unwrap();

        let loaded = store.load_items().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "New");
    }

    #[test]
    fn test_json_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/data/movies.json"));

        store.save_items(&[create_test_item("Heat", 1500.0)]).unwrap();
        assert_eq!(store.load_items().unwrap().len(), 1);
    }

    #[test]
    fn test_json_store_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(store.load_items().is_err());
    }

    #[test]
    fn test_json_store_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("movies.json"));
        store.save_items(&[create_test_item("Heat", 1500.0)]).unwrap();

        assert!(store.delete_items().unwrap());
        assert!(!store.path().exists());
        assert!(store.load_items().unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryItemStore::new();
        assert!(store.load_items().unwrap().is_empty());

        store.save_items(&[create_test_item("Heat", 1500.0)]).unwrap();
        assert_eq!(store.load_items().unwrap().len(), 1);

        assert!(store.delete_items().unwrap());
        assert!(!store.delete_items().unwrap());
        assert!(store.load_items().unwrap().is_empty());
    }

    #[test]
    fn test_mock_store_records_saves() {
        let store = MockItemStore::new();
        store.save_items(&[create_test_item("Heat", 1500.0)]).unwrap();

        let calls = store.get_save_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].title, "Heat");

        store.clear_save_calls();
        assert!(store.get_save_calls().is_empty());
    }
}
