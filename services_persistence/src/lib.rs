//! # Persistence Gateway
//!
//! Loads, saves, exports and imports the site document, and keeps the
//! per-exercise completion marks and workout statistics.
//!
//! ## Philosophy
//!
//! - **Tiered loading**: Saved data, then the remote default, then compiled defaults
//! - **Never lose the session**: An unusable store degrades to memory, once, loudly
//! - **Validate before mutate**: A rejected import leaves everything untouched
//! - **Versioned bundles**: Exports carry a format version

pub mod bundle;
pub mod gateway;
pub mod keys;
pub mod remote;
pub mod stats;

pub use bundle::{export_file_name, ExportBundle, ImportError, BUNDLE_VERSION};
pub use gateway::{builtin_defaults, LoadError, LoadSource, PersistenceGateway, SaveError};
pub use keys::StorageKeys;
pub use remote::{FetchError, Offline, RemoteSource, ScriptedRemote};
pub use stats::WorkoutStats;
