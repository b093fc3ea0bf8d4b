//! # Editor Core
//!
//! The editing session of the workout site: who may edit, what mode the
//! page is in, and how every user action reaches the saved document.
//!
//! ## Philosophy
//!
//! - **One context**: [`Editor`] owns the document, view, gate and gateway; nothing is global
//! - **Explicit modes**: Viewing, content editing and program editing, with a declared switch policy
//! - **Pull, mutate, render, persist**: Every structural edit runs the same sequence
//! - **Deterministic time**: Hosts pass the clock in, so autosave is testable
//! - **Errors reach the user**: Failures become notifications before they are returned
//!
//! ## Design
//!
//! - [`EditSession`]: the mode state machine
//! - [`Editor`]: application context wiring storage, gate, synchronizer and host traits
//! - [`Prompter`]: host dialogs (text prompts and confirmations)
//! - [`AutosaveTimer`]: input debounce
//! - [`EditorConfig`]: versioned JSON configuration

pub mod autosave;
pub mod config;
pub mod editor;
pub mod error;
pub mod prompt;
pub mod session;

pub use autosave::AutosaveTimer;
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, Progress};
pub use error::{SessionError, SessionResult};
pub use prompt::{PromptRequest, Prompter, ScriptedPrompter};
pub use session::{EditSession, ModeSwitchPolicy, Transition};
