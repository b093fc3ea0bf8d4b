//! Page layout skeleton
//!
//! A [`Layout`] lists every page and, in order, the static mount points on
//! it. Dynamic fragments are not part of the layout; they are mounted after
//! the last slot of their page, ahead of the page's control area.

use content_store::{block_key_for, ContentKey};
use serde::{Deserialize, Serialize};

fn default_tag() -> String {
    "p".to_string()
}

/// Mount point for one HTML fragment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSlot {
    pub key: ContentKey,
    /// Element the host renders the fragment in (`h2`, `h3`, `p`, ...)
    #[serde(default = "default_tag")]
    pub tag: String,
}

impl FragmentSlot {
    pub fn new(key: impl Into<ContentKey>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tag: tag.into(),
        }
    }
}

/// One static position on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Slot {
    Fragment(FragmentSlot),
    /// Group of fragments presented together
    Block {
        /// Derived from the first child when absent
        #[serde(default)]
        key: Option<ContentKey>,
        children: Vec<FragmentSlot>,
    },
    /// Workout schedule table, optionally headed by a title fragment
    Schedule {
        key: ContentKey,
        #[serde(default)]
        title: Option<FragmentSlot>,
    },
}

impl Slot {
    /// Key of a block slot
    pub fn block_key(&self) -> Option<ContentKey> {
        match self {
            Slot::Block { key: Some(key), .. } => Some(key.clone()),
            Slot::Block { key: None, children } => children
                .first()
                .map(|child| ContentKey::from(block_key_for(child.key.as_str()))),
            _ => None,
        }
    }

    /// Content keys mounted by this slot
    pub fn content_keys(&self) -> Vec<&ContentKey> {
        match self {
            Slot::Fragment(slot) => vec![&slot.key],
            Slot::Block { children, .. } => children.iter().map(|c| &c.key).collect(),
            Slot::Schedule { key, title } => {
                let mut keys = vec![key];
                keys.extend(title.iter().map(|t| &t.key));
                keys
            }
        }
    }
}

/// Static skeleton of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub id: String,
    /// Dynamic fragments on this page are wrapped in their own block
    #[serde(default)]
    pub wraps_blocks: bool,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

impl PageLayout {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wraps_blocks: false,
            slots: Vec::new(),
        }
    }

    pub fn wrapping_blocks(mut self) -> Self {
        self.wraps_blocks = true;
        self
    }

    pub fn with_fragment(mut self, key: &str, tag: &str) -> Self {
        self.slots.push(Slot::Fragment(FragmentSlot::new(key, tag)));
        self
    }

    pub fn with_block(mut self, children: &[(&str, &str)]) -> Self {
        self.slots.push(Slot::Block {
            key: None,
            children: children
                .iter()
                .map(|(key, tag)| FragmentSlot::new(*key, *tag))
                .collect(),
        });
        self
    }

    pub fn with_schedule(mut self, key: &str, title: Option<&str>) -> Self {
        self.slots.push(Slot::Schedule {
            key: key.into(),
            title: title.map(|t| FragmentSlot::new(t, "h2")),
        });
        self
    }

    pub fn content_keys(&self) -> impl Iterator<Item = &ContentKey> {
        self.slots.iter().flat_map(|slot| slot.content_keys())
    }
}

/// Every page of the site
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub pages: Vec<PageLayout>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: PageLayout) -> Self {
        self.pages.push(page);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn page(&self, id: &str) -> Option<&PageLayout> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// True if some static slot mounts `key`
    pub fn mounts(&self, key: &str) -> bool {
        self.pages
            .iter()
            .flat_map(|p| p.content_keys())
            .any(|k| k.as_str() == key)
    }

    /// The workout site: landing page, guidelines, the main program, three
    /// auxiliary programs, advice and FAQ
    pub fn workout_site() -> Self {
        Self::new()
            .with_page(
                PageLayout::new("start")
                    .with_fragment("start_title", "h2")
                    .with_fragment("start_p1", "p")
                    .with_fragment("start_p2", "p"),
            )
            .with_page(
                PageLayout::new("guidelines")
                    .wrapping_blocks()
                    .with_fragment("guidelines_title", "h2")
                    .with_block(&[("guidelines_rest_title", "h3"), ("guidelines_rest_p1", "p")])
                    .with_block(&[
                        ("guidelines_progress_title", "h3"),
                        ("guidelines_progress_p1", "p"),
                    ]),
            )
            .with_page(
                PageLayout::new("program")
                    .with_fragment("program_title", "h2")
                    .with_schedule(content_store::MAIN_SCHEDULE_KEY, None),
            )
            .with_page(
                PageLayout::new("heavy_duty")
                    .with_schedule("heavy_duty_workout_data", Some("heavy_duty_title")),
            )
            .with_page(
                PageLayout::new("endurance")
                    .with_schedule("endurance_workout_data", Some("endurance_title")),
            )
            .with_page(
                PageLayout::new("vtaper").with_schedule("vtaper_workout_data", Some("vtaper_title")),
            )
            .with_page(
                PageLayout::new("advice")
                    .wrapping_blocks()
                    .with_fragment("advice_title", "h2")
                    .with_block(&[("advice_sleep_title", "h3"), ("advice_sleep_p1", "p")])
                    .with_block(&[("advice_form_title", "h3"), ("advice_form_p1", "p")]),
            )
            .with_page(
                PageLayout::new("faq")
                    .with_fragment("faq_title", "h2")
                    .with_fragment("faq_q1", "h3")
                    .with_fragment("faq_a1", "p")
                    .with_fragment("faq_q2", "h3")
                    .with_fragment("faq_a2", "p"),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_key_derived_from_first_child() {
        let page = PageLayout::new("guidelines")
            .with_block(&[("guidelines_rest_title", "h3"), ("guidelines_rest_p1", "p")]);
        assert_eq!(
            page.slots[0].block_key(),
            Some(ContentKey::from("guidelines_rest_block"))
        );
    }

    #[test]
    fn test_explicit_block_key_wins() {
        let slot = Slot::Block {
            key: Some("custom_block".into()),
            children: vec![FragmentSlot::new("a_p1", "p")],
        };
        assert_eq!(slot.block_key(), Some(ContentKey::from("custom_block")));
    }

    #[test]
    fn test_site_mounts_known_keys() {
        let layout = Layout::workout_site();
        assert!(layout.mounts("start_title"));
        assert!(layout.mounts("guidelines_rest_p1"));
        assert!(layout.mounts("workout_data"));
        assert!(layout.mounts("heavy_duty_title"));
        assert!(!layout.mounts("start_dynamic_1_1_p"));
        assert!(layout.page("guidelines").unwrap().wraps_blocks);
        assert!(!layout.page("faq").unwrap().wraps_blocks);
    }

    #[test]
    fn test_layout_from_json() {
        let json = r#"{
            "pages": [
                {
                    "id": "start",
                    "slots": [
                        {"type": "fragment", "key": "title", "tag": "h1"},
                        {"type": "block", "children": [{"key": "start_p1"}]},
                        {"type": "schedule", "key": "workout_data"}
                    ]
                }
            ]
        }"#;
        let layout = Layout::from_json(json).unwrap();
        let page = layout.page("start").unwrap();
        assert!(!page.wraps_blocks);
        assert_eq!(page.slots.len(), 3);
        assert_eq!(
            page.slots[1],
            Slot::Block {
                key: None,
                children: vec![FragmentSlot::new("start_p1", "p")]
            }
        );
        let keys: Vec<&str> = page.content_keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["title", "start_p1", "workout_data"]);
    }
}
