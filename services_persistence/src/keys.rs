//! Storage key names

use serde::{Deserialize, Serialize};

/// Where each persisted item lives in the key/value store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub content: String,
    pub mark_prefix: String,
    pub stats: String,
}

impl StorageKeys {
    pub fn mark_key(&self, id: &str) -> String {
        format!("{}{}", self.mark_prefix, id)
    }

    /// Where an unreadable stored document is set aside
    pub fn corrupt_key(&self) -> String {
        format!("{}.corrupt", self.content)
    }

    /// Inverse of [`StorageKeys::mark_key`]
    pub fn mark_id<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.mark_prefix.as_str())
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            content: "siteContent".to_string(),
            mark_prefix: "checkbox_".to_string(),
            stats: "workout_stats".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_keys() {
        let keys = StorageKeys::default();
        assert_eq!(keys.mark_key("abc"), "checkbox_abc");
        assert_eq!(keys.mark_id("checkbox_abc"), Some("abc"));
        assert_eq!(keys.mark_id("siteContent"), None);
        assert_eq!(keys.corrupt_key(), "siteContent.corrupt");
    }

    #[test]
    fn test_partial_override() {
        let keys: StorageKeys = serde_json::from_str(r#"{"content":"doc"}"#).unwrap();
        assert_eq!(keys.content, "doc");
        assert_eq!(keys.mark_prefix, "checkbox_");
    }
}
