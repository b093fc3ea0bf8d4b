//! Training days and the schedule mutation API

use crate::exercise::{Exercise, ExerciseTemplate};
use crate::ids::{DayId, ExerciseId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Schedule mutation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkoutError {
    #[error("Day name cannot be empty")]
    EmptyDayName,

    #[error("Day not found: {0}")]
    DayNotFound(String),

    #[error("No exercise at position {position} in {day}")]
    RowNotFound { day: DayId, position: usize },
}

pub type WorkoutResult<T> = Result<T, WorkoutError>;

/// One training day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    #[serde(default)]
    pub id: DayId,
    /// Display label; older documents store it as `name_ru`
    #[serde(alias = "name_ru")]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Day {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DayId::new(),
            name: name.into(),
            exercises: Vec::new(),
        }
    }

    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }
}

/// A complete schedule, stored under a reserved document key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutData {
    #[serde(default)]
    pub days: Vec<Day>,
}

impl WorkoutData {
    pub fn new() -> Self {
        Self { days: Vec::new() }
    }

    pub fn day(&self, id: DayId) -> Option<&Day> {
        self.days.iter().find(|d| d.id == id)
    }

    pub fn day_mut(&mut self, id: DayId) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.id == id)
    }

    /// First day whose name matches exactly
    pub fn find_day_by_name(&self, name: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.name == name)
    }

    /// Appends an empty day; the name is trimmed
    pub fn add_day(&mut self, name: &str) -> WorkoutResult<DayId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkoutError::EmptyDayName);
        }
        let day = Day::new(name);
        let id = day.id;
        self.days.push(day);
        debug!(day = %id, name, "added day");
        Ok(id)
    }

    pub fn rename_day(&mut self, id: DayId, name: &str) -> WorkoutResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkoutError::EmptyDayName);
        }
        let day = self
            .day_mut(id)
            .ok_or_else(|| WorkoutError::DayNotFound(id.to_string()))?;
        day.name = name.to_string();
        Ok(())
    }

    /// Appends a row built from `template` to the given day
    pub fn add_exercise(&mut self, id: DayId, template: &ExerciseTemplate) -> WorkoutResult<ExerciseId> {
        let day = self
            .day_mut(id)
            .ok_or_else(|| WorkoutError::DayNotFound(id.to_string()))?;
        let exercise = template.instantiate();
        let exercise_id = exercise.id;
        day.exercises.push(exercise);
        debug!(day = %id, exercise = %exercise_id, "added exercise");
        Ok(exercise_id)
    }

    /// Name-addressed variant of [`WorkoutData::add_exercise`]
    ///
    /// With duplicate names the first matching day receives the row.
    pub fn add_exercise_by_name(
        &mut self,
        name: &str,
        template: &ExerciseTemplate,
    ) -> WorkoutResult<ExerciseId> {
        let id = self
            .find_day_by_name(name)
            .map(|d| d.id)
            .ok_or_else(|| WorkoutError::DayNotFound(name.to_string()))?;
        self.add_exercise(id, template)
    }

    /// Removes the day with this identifier
    pub fn delete_day(&mut self, id: DayId) -> WorkoutResult<Day> {
        let index = self
            .days
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| WorkoutError::DayNotFound(id.to_string()))?;
        debug!(day = %id, "deleted day");
        Ok(self.days.remove(index))
    }

    /// Removes every day whose name matches, returning how many went
    pub fn delete_days_named(&mut self, name: &str) -> usize {
        let before = self.days.len();
        self.days.retain(|d| d.name != name);
        let removed = before - self.days.len();
        debug!(name, removed, "deleted days by name");
        removed
    }

    /// Removes the row at `position` within the day
    pub fn delete_exercise_row(&mut self, id: DayId, position: usize) -> WorkoutResult<Exercise> {
        let day = self
            .day_mut(id)
            .ok_or_else(|| WorkoutError::DayNotFound(id.to_string()))?;
        if position >= day.exercises.len() {
            return Err(WorkoutError::RowNotFound { day: id, position });
        }
        let removed = day.exercises.remove(position);
        debug!(day = %id, position, exercise = %removed.id, "deleted exercise row");
        Ok(removed)
    }

    /// Drops unnamed days and partially filled exercises
    pub fn retain_valid(&mut self) {
        self.days.retain(|d| !d.name.trim().is_empty());
        for day in &mut self.days {
            day.exercises.retain(Exercise::is_valid);
        }
    }

    /// True when every day is named and every row is complete
    pub fn is_valid(&self) -> bool {
        self.days
            .iter()
            .all(|d| !d.name.trim().is_empty() && d.exercises.iter().all(Exercise::is_valid))
    }

    /// All exercises in display order
    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.days.iter().flat_map(|d| d.exercises.iter())
    }

    pub fn exercise_count(&self) -> usize {
        self.days.iter().map(|d| d.exercises.len()).sum()
    }
}
