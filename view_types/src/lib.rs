//! # View Types
//!
//! The rendered side of the editor: a page layout skeleton and the view tree
//! derived from it.
//!
//! ## Philosophy
//!
//! - **Views are derived**: A view tree is computed from a document, never patched
//! - **Affordances travel with nodes**: What a user may do is part of the view
//! - **Host-agnostic**: Nothing here knows about HTML elements or a browser
//! - **Testable**: Views are plain data and can be compared and serialized
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A DOM
//! - A styling or layout engine
//! - Navigation chrome

pub mod layout;
pub mod mode;
pub mod node;

pub use layout::{FragmentSlot, Layout, PageLayout, Slot};
pub use mode::EditMode;
pub use node::{
    Affordance, BlockNode, Cell, DayNode, FragmentNode, PageView, RowNode, ScheduleNode,
    ViewError, ViewNode, ViewTree,
};
