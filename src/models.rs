use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A named pointer to an immutable artifact in the registry.
///
/// Listing order is whatever the registry hands back; nothing here assumes
/// the tags arrive sorted.
#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tag {
    /// Ordering timestamp: the last update if the registry reports one,
    /// otherwise the creation time.
    pub fn effective_timestamp(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }
}

/// One page of a repository's tag listing.
#[derive(Debug, Clone)]
pub struct Page {
    pub tags: Vec<Tag>,
    /// Opaque continuation token; absent on the last page. Passed back to
    /// the registry verbatim, never inspected.
    pub next_cursor: Option<String>,
}

/// Retention parameters for a single cleanup run.
///
/// Deletion is opt-in: without `delete_regex` no tag is ever selected.
#[derive(Debug, Clone, Default)]
pub struct PolicyParams {
    pub delete_regex: Option<String>,
    pub keep_regex: Option<String>,
    pub keep_n: Option<usize>,
    pub older_than: Option<chrono::Duration>,
    pub disable_timeout: bool,
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    Success,
    Error,
}

/// Final outcome of a cleanup run.
///
/// `deleted_tags` only ever contains tags seen on fetched pages;
/// `original_size` counts every tag seen before the run stopped.
#[derive(Debug, Clone)]
pub struct CleanupResult {
    pub status: CleanupStatus,
    pub deleted_tags: BTreeSet<String>,
    pub original_size: usize,
    pub error_message: Option<String>,
    pub exception_kind: Option<String>,
}

impl CleanupResult {
    pub fn success(deleted_tags: BTreeSet<String>, original_size: usize) -> Self {
        Self {
            status: CleanupStatus::Success,
            deleted_tags,
            original_size,
            error_message: None,
            exception_kind: None,
        }
    }

    pub fn error(
        deleted_tags: BTreeSet<String>,
        original_size: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: CleanupStatus::Error,
            deleted_tags,
            original_size,
            error_message: Some(message.into()),
            exception_kind: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CleanupStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_tag_deserializes_from_listing_entry() {
        let tag: Tag = serde_json::from_str(
            r#"{
                "name": "v1.2.3",
                "digest": "sha256:abc123",
                "media_type": "application/vnd.oci.image.manifest.v1+json",
                "created_at": "2024-03-01T10:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(tag.name, "v1.2.3");
        assert_eq!(tag.digest, "sha256:abc123");
        assert_eq!(
            tag.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap())
        );
        assert!(tag.updated_at.is_none());
    }

    #[test]
    fn test_tag_deserializes_with_missing_metadata() {
        let tag: Tag = serde_json::from_str(r#"{"name": "latest"}"#).unwrap();

        assert_eq!(tag.name, "latest");
        assert!(tag.digest.is_empty());
        assert!(tag.effective_timestamp().is_none());
    }

    #[test]
    fn test_effective_timestamp_prefers_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let updated = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let base: Tag = serde_json::from_str(r#"{"name": "x"}"#).unwrap();

        let tag = Tag {
            created_at: Some(created),
            updated_at: Some(updated),
            ..base.clone()
        };
        assert_eq!(tag.effective_timestamp(), Some(updated));

        let tag = Tag {
            created_at: Some(created),
            updated_at: None,
            ..base
        };
        assert_eq!(tag.effective_timestamp(), Some(created));
    }
}
