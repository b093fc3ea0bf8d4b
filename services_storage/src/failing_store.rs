//! # Failing Store
//!
//! A [`KeyValueStore`] wrapper that can simulate disabled or full storage.
//! Useful for exercising the editor's fallback paths without a browser.

use crate::store::{KeyValueStore, StoreError, StoreResult};

/// Policy for when failures should occur
#[derive(Debug, Clone)]
pub enum FailurePolicy {
    /// Never fail (passthrough)
    Never,
    /// Every operation fails as if storage were disabled
    Disabled,
    /// Writes fail with a quota error after N successful writes
    AfterWrites(usize),
    /// Writes to the listed keys fail with a quota error
    OnKeys(Vec<String>),
}

/// Wrapper around a store that can simulate failures
pub struct FailingStore<S: KeyValueStore> {
    inner: S,
    policy: FailurePolicy,
    write_count: usize,
}

impl<S: KeyValueStore> FailingStore<S> {
    pub fn new(inner: S, policy: FailurePolicy) -> Self {
        Self {
            inner,
            policy,
            write_count: 0,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn write_count(&self) -> usize {
        self.write_count
    }

    /// Replaces the policy and resets the write counter
    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
        self.write_count = 0;
    }

    fn check_access(&self) -> StoreResult<()> {
        if matches!(self.policy, FailurePolicy::Disabled) {
            return Err(StoreError::Unavailable("storage disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_access()?;
        let fails = match &self.policy {
            FailurePolicy::AfterWrites(n) => self.write_count >= *n,
            FailurePolicy::OnKeys(keys) => keys.iter().any(|k| k == key),
            FailurePolicy::Never | FailurePolicy::Disabled => false,
        };
        if fails {
            return Err(StoreError::QuotaExceeded {
                needed: key.len() + value.len(),
                available: 0,
            });
        }
        Ok(())
    }
}

impl<S: KeyValueStore> KeyValueStore for FailingStore<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_access()?;
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.check_write(key, value)?;
        self.inner.set(key, value)?;
        self.write_count += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.check_access()?;
        self.inner.remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.check_access()?;
        self.inner.keys()
    }
}
