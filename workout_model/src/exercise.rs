//! Exercise rows and their validation

use crate::ids::ExerciseId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of a training day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Assigned on creation; documents written before identifiers existed
    /// receive a fresh one on load
    #[serde(default)]
    pub id: ExerciseId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sets: String,
    #[serde(default)]
    pub reps: String,
}

/// Reason an exercise row cannot be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExerciseIssue {
    #[error("Exercise name cannot be empty")]
    MissingName,

    #[error("Number of sets cannot be empty")]
    MissingSets,

    #[error("Number of reps cannot be empty")]
    MissingReps,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            id: ExerciseId::new(),
            name: name.into(),
            sets: sets.into(),
            reps: reps.into(),
        }
    }

    /// Checks that all three fields are present after trimming
    pub fn validate(&self) -> Result<(), ExerciseIssue> {
        if self.name.trim().is_empty() {
            return Err(ExerciseIssue::MissingName);
        }
        if self.sets.trim().is_empty() {
            return Err(ExerciseIssue::MissingSets);
        }
        if self.reps.trim().is_empty() {
            return Err(ExerciseIssue::MissingReps);
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Values used for a freshly added exercise row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    pub sets: String,
    pub reps: String,
}

impl ExerciseTemplate {
    pub const PLACEHOLDER_NAME: &'static str = "[NEW] Exercise";
    pub const PLACEHOLDER_SETS: &'static str = "3";
    pub const PLACEHOLDER_REPS: &'static str = "8-12";

    /// Instantiates the template with a new identifier
    pub fn instantiate(&self) -> Exercise {
        Exercise::new(self.name.clone(), self.sets.clone(), self.reps.clone())
    }
}

impl Default for ExerciseTemplate {
    fn default() -> Self {
        Self {
            name: Self::PLACEHOLDER_NAME.to_string(),
            sets: Self::PLACEHOLDER_SETS.to_string(),
            reps: Self::PLACEHOLDER_REPS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_exercise_is_valid() {
        let ex = Exercise::new("Squat", "5", "5");
        assert!(ex.is_valid());
    }

    #[test]
    fn test_whitespace_fields_are_missing() {
        assert_eq!(
            Exercise::new("  ", "3", "10").validate(),
            Err(ExerciseIssue::MissingName)
        );
        assert_eq!(
            Exercise::new("Row", "\t", "10").validate(),
            Err(ExerciseIssue::MissingSets)
        );
        assert_eq!(
            Exercise::new("Row", "3", "").validate(),
            Err(ExerciseIssue::MissingReps)
        );
    }

    #[test]
    fn test_template_default_is_placeholder() {
        let ex = ExerciseTemplate::default().instantiate();
        assert_eq!(ex.name, "[NEW] Exercise");
        assert_eq!(ex.sets, "3");
        assert_eq!(ex.reps, "8-12");
        assert!(ex.is_valid());
    }

    #[test]
    fn test_instantiate_assigns_fresh_ids() {
        let template = ExerciseTemplate::default();
        assert_ne!(template.instantiate().id, template.instantiate().id);
    }

    #[test]
    fn test_missing_id_gets_generated_on_load() {
        let ex: Exercise =
            serde_json::from_str(r#"{"name":"Dips","sets":"3","reps":"12"}"#).unwrap();
        assert_eq!(ex.name, "Dips");
        assert!(ex.is_valid());
    }
}
