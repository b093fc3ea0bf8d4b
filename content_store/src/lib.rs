//! # Content Store
//!
//! The flat document behind every page: content keys mapped to HTML
//! fragments, plus reserved keys holding workout schedules.
//!
//! ## Philosophy
//!
//! - **Flat**: One level of keys; structure lives only inside schedules
//! - **Keys carry meaning**: Generated keys encode their page and fragment type
//! - **Explicit ownership**: The store is owned by the editor context, never global

pub mod document;
pub mod key;
pub mod store;

pub use document::{ContentValue, Document, EntryError};
pub use key::{
    block_key_for, classify, is_schedule_key, BlockKind, ContentKey, KeyGenerator, KeyKind,
    DYNAMIC_MARKER, MAIN_SCHEDULE_KEY, SCHEDULE_SUFFIX,
};
pub use store::{ContentError, ContentStore};
