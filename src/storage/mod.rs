//! Persistence of the ranked collection

pub mod store;

pub use store::{InMemoryItemStore, ItemStore, JsonFileStore, MockItemStore};
