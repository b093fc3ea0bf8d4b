//! End-to-end editing sessions
//!
//! Each test drives an [`editor_core::Editor`] the way a page would: the
//! host answers prompts, edits mounted nodes and forwards timer ticks.
