//! Export bundles
//!
//! A bundle is the whole site document plus the completion marks, stamped
//! with the export time and the bundle format version.

use chrono::{DateTime, SecondsFormat, Utc};
use content_store::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use services_storage::StoreError;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::gateway::SaveError;

pub const BUNDLE_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import data is malformed: {0}")]
    Malformed(String),

    #[error("Imported document could not be saved: {0}")]
    Save(#[from] SaveError),

    #[error("Completion marks could not be restored: {0}")]
    Marks(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub content: Document,
    pub checkboxes: BTreeMap<String, bool>,
    pub export_date: String,
    pub version: String,
}

impl ExportBundle {
    pub fn new(content: Document, checkboxes: BTreeMap<String, bool>, now: DateTime<Utc>) -> Self {
        Self {
            content,
            checkboxes,
            export_date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: BUNDLE_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A validated import, ready to apply
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImportPlan {
    pub content: Document,
    /// `None` keeps the current marks
    pub checkboxes: Option<BTreeMap<String, bool>>,
}

impl ImportPlan {
    /// Checks a parsed bundle without touching any state
    ///
    /// `content` must be a JSON object that parses as a document;
    /// `checkboxes`, when present, must map ids to booleans. The version and
    /// export date are informational.
    pub fn validate(bundle: Value) -> Result<Self, ImportError> {
        let Value::Object(mut fields) = bundle else {
            return Err(ImportError::Malformed("bundle is not an object".to_string()));
        };

        let content = match fields.remove("content") {
            Some(content @ Value::Object(_)) => serde_json::from_value::<Document>(content)
                .map_err(|e| ImportError::Malformed(format!("content: {e}")))?,
            Some(_) => {
                return Err(ImportError::Malformed("content is not an object".to_string()));
            }
            None => return Err(ImportError::Malformed("content is missing".to_string())),
        };

        let checkboxes = match fields.remove("checkboxes") {
            None | Some(Value::Null) => None,
            Some(marks) => Some(
                serde_json::from_value::<BTreeMap<String, bool>>(marks)
                    .map_err(|e| ImportError::Malformed(format!("checkboxes: {e}")))?,
            ),
        };

        Ok(Self {
            content,
            checkboxes,
        })
    }
}

/// `workout-backup-<YYYY-MM-DD>.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("workout-backup-{}.json", now.format("%Y-%m-%d"))
}
