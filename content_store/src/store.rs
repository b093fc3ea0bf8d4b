//! In-memory content store owned by the editor

use crate::document::{ContentValue, Document};
use crate::key::{BlockKind, ContentKey, KeyGenerator};
use thiserror::Error;
use tracing::debug;
use workout_model::WorkoutData;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("Unknown content key: {0}")]
    UnknownKey(String),

    #[error("Key {0} holds a schedule, not a fragment")]
    NotAFragment(String),

    #[error("Key {0} does not hold a schedule")]
    NotASchedule(String),
}

/// The live document plus the generator for new block keys
///
/// Replaced wholesale by a load or an import; mutated by extraction and
/// schedule edits in between.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    document: Document,
    keys: KeyGenerator,
}

impl ContentStore {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            keys: KeyGenerator::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Swaps in a freshly loaded or imported document
    pub fn replace(&mut self, document: Document) -> Document {
        debug!(entries = document.len(), "content store replaced");
        core::mem::replace(&mut self.document, document)
    }

    /// Creates a dynamic fragment for `page` and returns its key
    pub fn add_fragment(&mut self, page: &str, kind: BlockKind, html: impl Into<String>, now_ms: u64) -> ContentKey {
        let key = self.keys.generate(page, kind, now_ms);
        self.document.insert(key.clone(), ContentValue::Fragment(html.into()));
        debug!(key = %key, "added fragment");
        key
    }

    /// Replaces the HTML of an existing fragment
    pub fn set_fragment(&mut self, key: &str, html: impl Into<String>) -> Result<(), ContentError> {
        let is_fragment = match self.document.get(key) {
            None => return Err(ContentError::UnknownKey(key.to_string())),
            Some(value) => value.as_fragment().is_some(),
        };
        if !is_fragment {
            return Err(ContentError::NotAFragment(key.to_string()));
        }
        self.document.insert(key, ContentValue::Fragment(html.into()));
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<ContentValue, ContentError> {
        let removed = self
            .document
            .remove(key)
            .ok_or_else(|| ContentError::UnknownKey(key.to_string()))?;
        debug!(key, "removed entry");
        Ok(removed)
    }

    pub fn schedule(&self, key: &str) -> Option<&WorkoutData> {
        self.document.schedule(key)
    }

    pub fn schedule_mut(&mut self, key: &str) -> Result<&mut WorkoutData, ContentError> {
        if self.document.fragment(key).is_some() {
            return Err(ContentError::NotASchedule(key.to_string()));
        }
        self.document
            .schedule_mut(key)
            .ok_or_else(|| ContentError::UnknownKey(key.to_string()))
    }

    /// Like [`ContentStore::schedule_mut`] but creates an empty schedule
    /// when the key is absent
    pub fn ensure_schedule(&mut self, key: &str) -> Result<&mut WorkoutData, ContentError> {
        if !self.document.contains_key(key) {
            self.document.insert(key, WorkoutData::new());
        }
        self.schedule_mut(key)
    }
}
