//! Persistence contract tests
//!
//! Stored documents, completion marks and export bundles are read back by
//! older and newer builds alike, so their shapes are pinned here.

#[allow(dead_code)]
const CONTENT_KEY: &str = "siteContent";
#[allow(dead_code)]
const MARK_PREFIX: &str = "checkbox_";
#[allow(dead_code)]
const STATS_KEY: &str = "workout_stats";
#[allow(dead_code)]
const BUNDLE_VERSION: &str = "1.0";
