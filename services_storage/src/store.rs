//! Store trait and errors

use thiserror::Error;

/// Key written and removed again to check that a store accepts writes
pub const PROBE_KEY: &str = "__storage_probe__";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded: needed {needed} bytes, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// String-keyed persistent storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key is not an error
    fn remove(&mut self, key: &str) -> StoreResult<()>;

    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Writes and removes [`PROBE_KEY`]
    fn probe(&mut self) -> StoreResult<()> {
        self.set(PROBE_KEY, PROBE_KEY)?;
        self.remove(PROBE_KEY)
    }

    /// Keys beginning with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn probe(&mut self) -> StoreResult<()> {
        (**self).probe()
    }
}
