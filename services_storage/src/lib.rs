//! # Storage Service
//!
//! Client-side key/value storage for the editor: the document, credential
//! hash, completion marks and stats all live here as string values.
//!
//! ## Philosophy
//!
//! - **Small surface**: get, set, remove, list keys; values are strings
//! - **Failure is data**: Disabled or full stores report errors, never panic
//! - **Swappable**: Hosts plug in their own backend behind [`KeyValueStore`]
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-process map with an optional byte quota
//! - [`JsonFileStore`]: a single JSON object on disk, rewritten atomically
//! - [`FailingStore`]: wrapper that injects failures for tests

pub mod failing_store;
pub mod file_store;
pub mod memory;
pub mod store;

pub use failing_store::{FailingStore, FailurePolicy};
pub use file_store::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{KeyValueStore, StoreError, StoreResult, PROBE_KEY};
