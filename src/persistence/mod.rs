//! Key-value persistence for integer records
//!
//! Features:
//! - One integer per key, read with a default
//! - JSON file backing with temp-file + rename writes
//! - In-memory store for tests and for running without storage

pub mod file;

pub use file::JsonFileStore;

use std::collections::BTreeMap;

/// A named key-value store of integers
pub trait KeyValueStore {
    /// Read `key`, or `default` if it is missing or unreadable
    fn get_int(&self, key: &str, default: i32) -> i32;
    /// Write `key`
    fn put_int(&mut self, key: &str, value: i32) -> anyhow::Result<()>;
}

/// Volatile store; scores last for the session only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, i32>,
    /// Number of successful writes, for checking write discipline
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: i32) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        (**self).get_int(key, default)
    }

    fn put_int(&mut self, key: &str, value: i32) -> anyhow::Result<()> {
        (**self).put_int(key, value)
    }
}
