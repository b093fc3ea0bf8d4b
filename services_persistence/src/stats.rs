//! Workout statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Completed-program counter, bumped on every progress reset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    #[serde(default)]
    pub total_workouts: u64,
    #[serde(default)]
    pub last_reset: Option<DateTime<Utc>>,
}

impl WorkoutStats {
    pub fn record_reset(&mut self, now: DateTime<Utc>) {
        self.total_workouts += 1;
        self.last_reset = Some(now);
    }
}
