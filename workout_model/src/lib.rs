//! # Workout Model
//!
//! Structured workout schedule: ordered days holding ordered exercises.
//!
//! ## Philosophy
//!
//! - **Stable identity**: Days and exercises carry generated identifiers;
//!   names are display fields only
//! - **Soft validation**: Partially filled exercises are dropped, not reported
//! - **Serializable**: The schedule is embedded verbatim in the persisted document
//!
//! ## Example
//!
//! ```ignore
//! use workout_model::{ExerciseTemplate, WorkoutData};
//!
//! let mut schedule = WorkoutData::new();
//! let monday = schedule.add_day("Mon")?;
//! schedule.add_exercise(monday, &ExerciseTemplate::default())?;
//! ```

pub mod exercise;
pub mod ids;
pub mod schedule;

pub use exercise::{Exercise, ExerciseIssue, ExerciseTemplate};
pub use ids::{DayId, ExerciseId};
pub use schedule::{Day, WorkoutData, WorkoutError, WorkoutResult};
