//! The persistence gateway

use crate::bundle::{ExportBundle, ImportError, ImportPlan};
use crate::keys::StorageKeys;
use crate::remote::{FetchError, RemoteSource};
use crate::stats::WorkoutStats;
use chrono::{DateTime, Utc};
use content_store::{ContentValue, Document};
use serde_json::Value;
use services_notification::Notifier;
use services_storage::{KeyValueStore, MemoryStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

const DEFAULT_CONTENT: &str = include_str!("../assets/default_content.json");

/// The compiled-in default document
pub fn builtin_defaults() -> Option<Document> {
    match Document::from_json(DEFAULT_CONTENT) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(error = %e, "built-in default content is invalid");
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No content source is available")]
    NoSource,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Document JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Tier a document was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Store,
    Remote,
    Defaults,
}

/// Document read from the store tier
struct StoredDocument {
    document: Document,
    /// Keys left out because their value could not be read
    skipped: Vec<String>,
    /// The stored text differs from what `document` serializes to
    needs_rewrite: bool,
}

/// Owns the key/value store and everything persisted in it
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
    remote: Box<dyn RemoteSource>,
    defaults: Option<Document>,
    keys: StorageKeys,
    volatile: bool,
}

impl PersistenceGateway {
    /// Probes `store`; an unusable store is swapped for memory
    pub fn open(
        store: Box<dyn KeyValueStore>,
        remote: Box<dyn RemoteSource>,
        keys: StorageKeys,
        notifier: &mut dyn Notifier,
    ) -> Self {
        let mut gateway = Self {
            store,
            remote,
            defaults: builtin_defaults(),
            keys,
            volatile: false,
        };
        if let Err(e) = gateway.store.probe() {
            warn!(error = %e, "storage unavailable, keeping data in memory");
            notifier.warning("Storage is unavailable. Changes will be lost when the page closes.");
            gateway.store = Box::new(MemoryStore::new());
            gateway.volatile = true;
        }
        gateway
    }

    /// Replaces the compiled-in default document
    pub fn with_defaults(mut self, defaults: Option<Document>) -> Self {
        self.defaults = defaults;
        self
    }

    /// True when the session runs on the in-memory fallback
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Direct access for collaborators keeping their own entries here
    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Loads the document from the first tier that has one
    pub fn load(&mut self, notifier: &mut dyn Notifier) -> Result<Document, LoadError> {
        self.load_with_source(notifier).map(|(doc, _)| doc)
    }

    pub fn load_with_source(
        &mut self,
        notifier: &mut dyn Notifier,
    ) -> Result<(Document, LoadSource), LoadError> {
        let mut cache_fallback = true;
        match self.stored_document() {
            Ok(Some(stored)) if !stored.document.is_empty() => {
                debug!(
                    entries = stored.document.len(),
                    skipped = stored.skipped.len(),
                    "loaded document from store"
                );
                if !stored.skipped.is_empty() {
                    self.set_aside_stored_text();
                    notifier.warning("Some saved entries could not be read and were set aside.");
                }
                if stored.needs_rewrite {
                    self.write_back(&stored.document);
                }
                return Ok((stored.document, LoadSource::Store));
            }
            Ok(Some(_)) => {
                warn!("no stored entry is readable");
                self.set_aside_stored_text();
                notifier.error("Saved data could not be read.");
                cache_fallback = false;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "stored document unreadable");
                self.set_aside_stored_text();
                notifier.error("Saved data could not be read.");
                cache_fallback = false;
            }
        }

        let fallback_message = match self.remote.fetch_default() {
            Ok(doc) => {
                info!(entries = doc.len(), "loaded document from remote");
                if cache_fallback {
                    self.write_back(&doc);
                }
                return Ok((doc, LoadSource::Remote));
            }
            Err(FetchError::Unavailable) => "Default content loaded for offline use.",
            Err(e) => {
                warn!(error = %e, "remote content failed");
                "Default content loaded because the published content is unavailable."
            }
        };

        match self.defaults.clone() {
            Some(doc) => {
                info!(entries = doc.len(), "loaded built-in defaults");
                if cache_fallback {
                    self.write_back(&doc);
                }
                notifier.info(fallback_message);
                Ok((doc, LoadSource::Defaults))
            }
            None => {
                notifier.error("Content could not be loaded.");
                Err(LoadError::NoSource)
            }
        }
    }

    /// A stored document counts only when it is a non-empty object
    ///
    /// Entries whose value is neither a fragment nor a schedule are skipped
    /// rather than failing the whole document.
    fn stored_document(&self) -> Result<Option<StoredDocument>, SaveError> {
        let Some(text) = self.store.get(&self.keys.content)? else {
            return Ok(None);
        };
        let map = match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) if !map.is_empty() => map,
            _ => return Ok(None),
        };

        let mut document = Document::new();
        let mut skipped = Vec::new();
        for (key, value) in &map {
            match serde_json::from_value::<ContentValue>(value.clone()) {
                Ok(value) => {
                    document.insert(key.as_str(), value);
                }
                Err(e) => {
                    warn!(key = key.as_str(), error = %e, "skipped unreadable entry");
                    skipped.push(key.clone());
                }
            }
        }

        // Ids assigned while parsing only become stable once written
        let needs_rewrite = serde_json::to_value(&document)? != Value::Object(map);
        Ok(Some(StoredDocument {
            document,
            skipped,
            needs_rewrite,
        }))
    }

    /// Copies the raw stored text next to the document before it is replaced
    fn set_aside_stored_text(&mut self) {
        let key = self.keys.corrupt_key();
        let result = match self.store.get(&self.keys.content) {
            Ok(Some(text)) => self.store.set(&key, &text),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!(key = key.as_str(), "set aside unreadable stored document"),
            Err(e) => warn!(error = %e, "could not set aside stored document"),
        }
    }

    fn write_back(&mut self, doc: &Document) {
        if let Err(e) = self.save(doc) {
            warn!(error = %e, "could not cache loaded document");
        }
    }

    pub fn save(&mut self, doc: &Document) -> Result<(), SaveError> {
        let json = doc.to_json()?;
        self.store.set(&self.keys.content, &json)?;
        debug!(entries = doc.len(), bytes = json.len(), "saved document");
        Ok(())
    }

    pub fn mark(&self, id: &str) -> bool {
        matches!(
            self.store.get(&self.keys.mark_key(id)),
            Ok(Some(value)) if value == "true"
        )
    }

    pub fn set_mark(&mut self, id: &str, checked: bool) -> StoreResult<()> {
        let value = if checked { "true" } else { "false" };
        self.store.set(&self.keys.mark_key(id), value)
    }

    /// Every stored mark, keyed by exercise id
    pub fn marks(&self) -> StoreResult<BTreeMap<String, bool>> {
        let mut marks = BTreeMap::new();
        for key in self.store.keys_with_prefix(&self.keys.mark_prefix)? {
            if let Some(id) = self.keys.mark_id(&key) {
                let value = self.store.get(&key)?;
                marks.insert(id.to_string(), value.as_deref() == Some("true"));
            }
        }
        Ok(marks)
    }

    pub fn clear_marks(&mut self) -> StoreResult<usize> {
        let keys = self.store.keys_with_prefix(&self.keys.mark_prefix)?;
        for key in &keys {
            self.store.remove(key)?;
        }
        debug!(cleared = keys.len(), "cleared completion marks");
        Ok(keys.len())
    }

    /// Unreadable statistics count as fresh ones
    pub fn stats(&self) -> WorkoutStats {
        self.store
            .get(&self.keys.stats)
            .ok()
            .flatten()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }

    pub fn record_reset(&mut self, now: DateTime<Utc>) -> Result<WorkoutStats, SaveError> {
        let mut stats = self.stats();
        stats.record_reset(now);
        self.store
            .set(&self.keys.stats, &serde_json::to_string(&stats)?)?;
        info!(total = stats.total_workouts, "recorded progress reset");
        Ok(stats)
    }

    /// The saved document and marks; an empty document when nothing is saved
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> Result<ExportBundle, SaveError> {
        let content = self
            .stored_document()?
            .map(|stored| stored.document)
            .unwrap_or_default();
        Ok(ExportBundle::new(content, self.marks()?, now))
    }

    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, SaveError> {
        Ok(self.export_snapshot(now)?.to_json()?)
    }

    /// Validates and applies a parsed bundle, returning the new document
    ///
    /// Marks are replaced when the bundle carries `checkboxes` and kept
    /// otherwise.
    pub fn import_snapshot(&mut self, bundle: Value) -> Result<Document, ImportError> {
        let plan = ImportPlan::validate(bundle)?;

        self.save(&plan.content)?;
        if let Some(marks) = &plan.checkboxes {
            self.clear_marks()?;
            for (id, checked) in marks {
                self.set_mark(id, *checked)?;
            }
        }
        info!(
            entries = plan.content.len(),
            marks = plan.checkboxes.as_ref().map(BTreeMap::len),
            "imported snapshot"
        );
        Ok(plan.content)
    }

    pub fn import_json(&mut self, text: &str) -> Result<Document, ImportError> {
        let bundle: Value =
            serde_json::from_str(text).map_err(|e| ImportError::Malformed(e.to_string()))?;
        self.import_snapshot(bundle)
    }
}
