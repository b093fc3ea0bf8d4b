//! Editor configuration
//!
//! Stored as versioned JSON. Every field has a built-in default, so a file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};
use services_persistence::StorageKeys;
use thiserror::Error;
use workout_model::ExerciseTemplate;

use crate::session::ModeSwitchPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to parse editor config: {0}")]
    Parse(String),

    #[error("Unsupported editor config version: {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Version of the config format
    pub version: u32,
    pub storage: StorageKeys,
    /// Store key holding the password credential
    pub credential_key: String,
    /// Seeded when no credential is stored
    pub default_password: String,
    /// Idle window before pending edits are saved
    pub autosave_idle_ms: u64,
    /// Fragments that stay read-only in content mode
    pub locked_keys: Vec<String>,
    /// Pages that accept new blocks
    pub editable_pages: Vec<String>,
    /// Schedule counted by progress and cleared by a reset
    pub main_schedule: String,
    pub mode_switch_policy: ModeSwitchPolicy,
    /// Values of a freshly added exercise row
    pub placeholder: ExerciseTemplate,
}

impl EditorConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            storage: StorageKeys::default(),
            credential_key: "app_auth_hash".to_string(),
            default_password: "admin".to_string(),
            autosave_idle_ms: 1000,
            locked_keys: [
                "start_title",
                "guidelines_title",
                "program_title",
                "advice_title",
                "faq_title",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            editable_pages: ["start", "guidelines", "advice", "faq"]
                .into_iter()
                .map(String::from)
                .collect(),
            main_schedule: "workout_data".to_string(),
            mode_switch_policy: ModeSwitchPolicy::default(),
            placeholder: ExerciseTemplate::default(),
        }
    }
}
