//! # View Synchronizer
//!
//! Keeps the rendered view tree and the flat document in step.
//!
//! ## Philosophy
//!
//! - **Render is a function**: `render(doc, mode)` always starts from the layout
//! - **Extract is its inverse**: Writing a rendered view back reproduces the document
//! - **Unmounted means deleted**: Keys without a mounted node are collected on extract

mod extract;
mod render;

pub use render::ViewSynchronizer;
