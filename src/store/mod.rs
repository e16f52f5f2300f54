//! Durable key/value storage
//!
//! The store mirrors what the timer and chat panel need to survive a
//! restart. Values are plain strings; interpreting them is left to the
//! typed layer in [`timer_store`].

pub mod file_store;
pub mod memory_store;
pub mod timer_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use timer_store::{keys, ChatHistoryStore, TimerStore};

use crate::error::StoreError;

/// A single pending change: `Some` sets the key, `None` removes it
pub type Entry<'a> = (&'a str, Option<String>);

/// String key/value store with last-write-wins semantics
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Option<String>;

    /// Apply a batch of changes as one write
    fn write_batch(&self, entries: Vec<Entry<'_>>) -> Result<(), StoreError>;

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.write_batch(vec![(key, Some(value))])
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.write_batch(vec![(key, None)])
    }
}
