//! Content keys and their kinds

use core::borrow::Borrow;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Marker separating the owning page from the generated part of a key
pub const DYNAMIC_MARKER: &str = "_dynamic_";

/// Key of the main workout program
pub const MAIN_SCHEDULE_KEY: &str = "workout_data";

/// Suffix shared by auxiliary program keys (`heavy_duty_workout_data`, ...)
pub const SCHEDULE_SUFFIX: &str = "_workout_data";

/// Unique identifier of one entry in the document
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(String);

/// Fragment type of a user-added block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Paragraph (`p`)
    #[serde(rename = "p")]
    Paragraph,
    /// Third-level heading (`h3`)
    #[serde(rename = "h3")]
    Heading,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading => "h3",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "p" => Some(BlockKind::Paragraph),
            "h3" => Some(BlockKind::Heading),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a key by its spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyKind {
    /// Authored identifier bound to a fixed slot in the layout
    Static,
    /// Runtime-generated fragment owned by a page
    Dynamic { page: String, kind: BlockKind },
    /// Generated key whose type suffix is not a known fragment type
    UnknownDynamic { page: String },
    /// Reserved key holding a workout schedule
    Schedule,
}

impl ContentKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> KeyKind {
        classify(&self.0)
    }

    pub fn is_dynamic(&self) -> bool {
        self.0.contains(DYNAMIC_MARKER)
    }

    pub fn is_schedule(&self) -> bool {
        is_schedule_key(&self.0)
    }

    /// Clock reading and counter embedded in a dynamic key
    ///
    /// Keys written without a counter report `0` for it. Static and reserved
    /// keys have no creation order.
    pub fn creation_order(&self) -> Option<(u64, u64)> {
        let (_, rest) = self.0.split_once(DYNAMIC_MARKER)?;
        let mut parts = rest.split('_');
        let millis = parts.next()?.parse().ok()?;
        let counter = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
        Some((millis, counter))
    }

    /// Key of the wrapper block that presents this fragment
    pub fn block_key(&self) -> ContentKey {
        ContentKey(block_key_for(&self.0))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ContentKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ContentKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

pub fn is_schedule_key(key: &str) -> bool {
    key == MAIN_SCHEDULE_KEY || key.ends_with(SCHEDULE_SUFFIX)
}

pub fn classify(key: &str) -> KeyKind {
    if is_schedule_key(key) {
        return KeyKind::Schedule;
    }
    match key.split_once(DYNAMIC_MARKER) {
        Some((page, rest)) => {
            let suffix = rest.rsplit('_').next().unwrap_or_default();
            match BlockKind::parse(suffix) {
                Some(kind) => KeyKind::Dynamic {
                    page: page.to_string(),
                    kind,
                },
                None => KeyKind::UnknownDynamic {
                    page: page.to_string(),
                },
            }
        }
        None => KeyKind::Static,
    }
}

/// Derives a block key by replacing a trailing `_p`, `_pN`, `_h3` or
/// `_title` with `_block`
pub fn block_key_for(key: &str) -> String {
    if let Some((head, tail)) = key.rsplit_once('_') {
        let is_paragraph = tail
            .strip_prefix('p')
            .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()));
        if is_paragraph || tail == "h3" || tail == "title" {
            return format!("{head}_block");
        }
    }
    format!("{key}_block")
}

/// Produces fresh dynamic keys
///
/// Keys embed the caller-supplied clock reading and a per-session counter,
/// so two keys generated in the same millisecond still differ.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    counter: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self { counter: 1 }
    }

    pub fn generate(&mut self, page: &str, kind: BlockKind, now_ms: u64) -> ContentKey {
        let key = format!("{page}{DYNAMIC_MARKER}{now_ms}_{}_{kind}", self.counter);
        self.counter += 1;
        ContentKey(key)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}
