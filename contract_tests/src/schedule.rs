//! Workout model contract tests
//!
//! The id-addressed API is what sessions use; the name-addressed API keeps
//! its legacy semantics: duplicates collapse on delete and resolve to the
//! first match on insert.
