//! Stable identifiers for schedule entities

use core::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a training day, assigned once at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayId(Uuid);

impl DayId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DayId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day:{}", self.0)
    }
}

/// Identifier of an exercise row
///
/// Completion marks are keyed by this value, so it must survive reordering
/// and edits to neighbouring rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(Uuid);

impl ExerciseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Key used for the exercise's completion mark
    pub fn mark_id(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for ExerciseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exercise:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        assert_ne!(DayId::new(), DayId::new());
        assert_ne!(ExerciseId::new(), ExerciseId::new());
    }

    #[test]
    fn test_display_prefixes() {
        assert!(DayId::new().to_string().starts_with("day:"));
        assert!(ExerciseId::new().to_string().starts_with("exercise:"));
    }

    #[test]
    fn test_mark_id_is_stable_and_compact() {
        let id = ExerciseId::new();
        assert_eq!(id.mark_id(), id.mark_id());
        assert_eq!(id.mark_id().len(), 32);
        assert!(!id.mark_id().contains('-'));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = DayId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
        let back: DayId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
