//! Edit modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the site, if any, is currently editable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    /// Read-only
    #[default]
    Viewing,
    /// Free-form content blocks are editable
    ContentEditing,
    /// Workout schedules are editable
    ProgramEditing,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Viewing => "VIEWING",
            EditMode::ContentEditing => "CONTENT",
            EditMode::ProgramEditing => "PROGRAM",
        }
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self, EditMode::Viewing)
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
