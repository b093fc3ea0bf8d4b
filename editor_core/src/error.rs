//! Session errors

use access_gate::GateError;
use content_store::ContentError;
use services_notification::NotificationLevel;
use services_persistence::{ImportError, LoadError, SaveError};
use services_storage::StoreError;
use thiserror::Error;
use view_types::{EditMode, ViewError};
use workout_model::WorkoutError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Operation requires {expected} mode, editor is in {actual} mode")]
    WrongMode { expected: EditMode, actual: EditMode },

    #[error("Close {active} editing first")]
    ModeConflict { active: EditMode },

    #[error("Wrong password")]
    AuthFailed,

    #[error("Input cannot be empty")]
    EmptyInput,

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("Unknown schedule: {0}")]
    UnknownSchedule(String),

    #[error(transparent)]
    Workout(#[from] WorkoutError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Level used when the error reaches the user
    pub fn level(&self) -> NotificationLevel {
        match self {
            SessionError::WrongMode { .. }
            | SessionError::ModeConflict { .. }
            | SessionError::EmptyInput
            | SessionError::Workout(WorkoutError::EmptyDayName) => NotificationLevel::Warning,
            _ => NotificationLevel::Error,
        }
    }

    /// Text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Save(_) => "Could not save changes.".to_string(),
            SessionError::Import(ImportError::Malformed(_)) => {
                "Import failed: the file is not a valid backup.".to_string()
            }
            SessionError::Import(_) => "Import failed: data could not be stored.".to_string(),
            other => other.to_string(),
        }
    }
}
