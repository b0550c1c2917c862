//! Core data types shared by the store client and the controllers.
//!
//! An [`Item`] is the client's transient projection of a record owned by
//! the remote store. A [`Query`] is the parsed form of raw search input.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Maximum key length accepted by the store.
pub const MAX_KEY_LEN: usize = 50;

/// User tags are lowercase alphanumerics and dashes, 1 to 20 characters.
static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]{1,20}$").unwrap());

/// A key/value record with its tags, as served by the remote store.
///
/// The client never owns an item; it holds a projection created from a
/// search or create response, patched in place by tag operations, and
/// dropped when a delete confirms or a later search excludes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            tags: Vec::new(),
        }
    }
}

/// Parsed search input.
///
/// The raw text is split on whitespace into an ordered tag sequence. The
/// sentinel `"*"` and the empty string both mean match-all (empty tags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw: String,
    pub tags: Vec<String>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let tags = if trimmed.is_empty() || trimmed == "*" {
            Vec::new()
        } else {
            trimmed.split_whitespace().map(str::to_string).collect()
        };
        Self {
            raw: raw.to_string(),
            tags,
        }
    }

    /// True when the query matches every item (no tag filter).
    pub fn is_match_all(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Validate a key before a create is attempted.
///
/// Mirrors the store's own rules so obviously bad input never leaves the
/// client: non-empty, at most [`MAX_KEY_LEN`] characters, no surrounding
/// whitespace, printable characters only.
pub fn validate_key(key: &str) -> Result<(), SyncError> {
    if key.is_empty() {
        return Err(SyncError::validation("key must not be empty"));
    }
    if key != key.trim() {
        return Err(SyncError::validation(
            "key cannot start or end with whitespace",
        ));
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(SyncError::validation(format!(
            "key cannot exceed {MAX_KEY_LEN} characters"
        )));
    }
    if key.chars().any(|c| c.is_control()) {
        return Err(SyncError::validation(
            "key cannot contain non-printable characters",
        ));
    }
    Ok(())
}

/// Validate a user tag before an add is attempted.
pub fn validate_tag(tag: &str) -> Result<(), SyncError> {
    if tag.is_empty() {
        return Err(SyncError::validation("tag must not be empty"));
    }
    if !TAG_PATTERN.is_match(tag) {
        return Err(SyncError::validation(format!(
            "tag `{tag}` must match {}",
            TAG_PATTERN.as_str()
        )));
    }
    Ok(())
}
