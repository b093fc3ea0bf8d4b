//! The flat persisted document

use crate::key::{ContentKey, KeyKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use workout_model::WorkoutData;

/// Value held under a content key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentValue {
    /// HTML fragment, stored verbatim
    Fragment(String),
    /// Workout schedule (reserved keys only)
    Schedule(WorkoutData),
}

impl ContentValue {
    pub fn as_fragment(&self) -> Option<&str> {
        match self {
            ContentValue::Fragment(s) => Some(s.as_str()),
            ContentValue::Schedule(_) => None,
        }
    }

    pub fn as_schedule(&self) -> Option<&WorkoutData> {
        match self {
            ContentValue::Schedule(data) => Some(data),
            ContentValue::Fragment(_) => None,
        }
    }
}

impl From<&str> for ContentValue {
    fn from(s: &str) -> Self {
        ContentValue::Fragment(s.to_string())
    }
}

impl From<String> for ContentValue {
    fn from(s: String) -> Self {
        ContentValue::Fragment(s)
    }
}

impl From<WorkoutData> for ContentValue {
    fn from(data: WorkoutData) -> Self {
        ContentValue::Schedule(data)
    }
}

/// Entry whose value does not match what its key kind requires
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("Reserved key {0} must hold a schedule")]
    ExpectedSchedule(ContentKey),

    #[error("Key {0} must hold a fragment")]
    ExpectedFragment(ContentKey),

    #[error("Generated key {0} has an unknown fragment type")]
    UnknownFragmentType(ContentKey),
}

/// Mapping from content keys to values, ordered by key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: BTreeMap<ContentKey, ContentValue>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn get(&self, key: &str) -> Option<&ContentValue> {
        self.entries.get(key)
    }

    pub fn fragment(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ContentValue::as_fragment)
    }

    pub fn schedule(&self, key: &str) -> Option<&WorkoutData> {
        self.get(key).and_then(ContentValue::as_schedule)
    }

    pub fn schedule_mut(&mut self, key: &str) -> Option<&mut WorkoutData> {
        match self.entries.get_mut(key) {
            Some(ContentValue::Schedule(data)) => Some(data),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<ContentKey>, value: impl Into<ContentValue>) -> Option<ContentValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<ContentValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ContentKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentKey, &ContentValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the entries for which `f` returns true
    pub fn retain(&mut self, mut f: impl FnMut(&ContentKey, &ContentValue) -> bool) {
        self.entries.retain(|k, v| f(k, v));
    }

    /// Fragments generated at runtime for `page`, oldest first
    pub fn dynamic_fragments<'a>(&'a self, page: &str) -> Vec<(&'a ContentKey, &'a str)> {
        let mut fragments: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(key, value)| match (key.kind(), value) {
                (KeyKind::Dynamic { page: owner, .. }, ContentValue::Fragment(html)) if owner == page => {
                    Some((key, html.as_str()))
                }
                _ => None,
            })
            .collect();
        fragments.sort_by_key(|(key, _)| key.creation_order());
        fragments
    }

    /// Checks that every value matches its key kind
    pub fn check_entries(&self) -> Result<(), EntryError> {
        for (key, value) in &self.entries {
            match (key.kind(), value) {
                (KeyKind::Schedule, ContentValue::Fragment(_)) => {
                    return Err(EntryError::ExpectedSchedule(key.clone()));
                }
                (KeyKind::UnknownDynamic { .. }, _) => {
                    return Err(EntryError::UnknownFragmentType(key.clone()));
                }
                (KeyKind::Static | KeyKind::Dynamic { .. }, ContentValue::Schedule(_)) => {
                    return Err(EntryError::ExpectedFragment(key.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl FromIterator<(ContentKey, ContentValue)> for Document {
    fn from_iter<I: IntoIterator<Item = (ContentKey, ContentValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_model::{Day, Exercise};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.insert("start_title", "Hi");
        doc.insert("faq_dynamic_1_1_p", "<b>dyn</b>");
        doc.insert(
            "workout_data",
            WorkoutData {
                days: vec![Day::new("Mon").with_exercise(Exercise::new("Squat", "5", "5"))],
            },
        );
        doc
    }

    #[test]
    fn test_json_shape_is_flat() {
        let doc = sample();
        let json: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(json["start_title"], "Hi");
        assert_eq!(json["workout_data"]["days"][0]["name"], "Mon");
        assert_eq!(json["workout_data"]["days"][0]["exercises"][0]["sets"], "5");
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample();
        let back = Document::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_typed_accessors() {
        let doc = sample();
        assert_eq!(doc.fragment("start_title"), Some("Hi"));
        assert!(doc.fragment("workout_data").is_none());
        assert_eq!(doc.schedule("workout_data").unwrap().days.len(), 1);
        assert!(doc.schedule("start_title").is_none());
    }

    #[test]
    fn test_dynamic_fragments_filtered_by_page() {
        let mut doc = sample();
        doc.insert("advice_dynamic_2_1_h3", "Other page");
        let faq = doc.dynamic_fragments("faq");
        assert_eq!(faq.len(), 1);
        assert_eq!(faq[0].1, "<b>dyn</b>");
    }

    #[test]
    fn test_dynamic_fragments_in_creation_order() {
        let mut doc = Document::new();
        doc.insert("faq_dynamic_1700000000000_10_p", "tenth");
        doc.insert("faq_dynamic_1700000000000_9_p", "ninth");
        doc.insert("faq_dynamic_999_1_h3", "earlier");
        doc.insert("faq_dynamic_1700000000001_1_p", "later");
        let order: Vec<&str> = doc
            .dynamic_fragments("faq")
            .into_iter()
            .map(|(_, html)| html)
            .collect();
        assert_eq!(order, ["earlier", "ninth", "tenth", "later"]);
    }

    #[test]
    fn test_check_entries_flags_mismatched_values() {
        assert!(sample().check_entries().is_ok());

        let mut doc = Document::new();
        doc.insert("workout_data", "not a schedule");
        assert!(matches!(doc.check_entries(), Err(EntryError::ExpectedSchedule(_))));

        let mut doc = Document::new();
        doc.insert("title", WorkoutData::new());
        assert!(matches!(doc.check_entries(), Err(EntryError::ExpectedFragment(_))));
    }

    #[test]
    fn test_non_string_values_rejected() {
        assert!(Document::from_json(r#"{"title": 5}"#).is_err());
        assert!(Document::from_json(r#"["title"]"#).is_err());
    }
}
