use chrono::{DateTime, Duration, Utc};
use regex::Regex;

use crate::error::AppError;
use crate::models::{PolicyParams, Tag};

/// Compiled retention policy.
///
/// Evaluation is a pure function of the tag set and the supplied clock; no
/// state carries over between pages. Rules apply in a fixed order: the
/// delete pattern selects candidates, the keep pattern removes protected
/// tags, keep-N spares the newest N, and the age cutoff filters what is
/// left.
pub struct RetentionPolicy {
    delete: Option<Regex>,
    keep: Option<Regex>,
    keep_n: Option<usize>,
    older_than: Option<Duration>,
}

impl RetentionPolicy {
    pub fn new(params: &PolicyParams) -> Result<Self, AppError> {
        let delete = compile(params.delete_regex.as_deref())?;
        let keep = compile(params.keep_regex.as_deref())?;
        Ok(Self {
            delete,
            keep,
            keep_n: params.keep_n,
            older_than: params.older_than,
        })
    }

    /// Return the tags to delete from one page, in deletion order.
    ///
    /// Deletion is strictly opt-in: without a delete pattern nothing is
    /// ever selected. A tag matching both patterns is protected; protected
    /// tags do not count against keep-N.
    pub fn deletion_set(&self, tags: &[Tag], now: DateTime<Utc>) -> Vec<Tag> {
        let Some(delete) = &self.delete else {
            return Vec::new();
        };

        let mut candidates: Vec<Tag> = tags
            .iter()
            .filter(|tag| delete.is_match(&tag.name))
            .cloned()
            .collect();

        if let Some(keep) = &self.keep {
            candidates.retain(|tag| !keep.is_match(&tag.name));
        }

        if let Some(keep_n) = self.keep_n {
            // Newest first; undated tags sort last, so they are dropped first.
            candidates.sort_by(|a, b| b.effective_timestamp().cmp(&a.effective_timestamp()));
            candidates.drain(..keep_n.min(candidates.len()));
        }

        if let Some(older_than) = self.older_than {
            let cutoff = now - older_than;
            // Undated tags survive: age alone never justifies deleting them.
            candidates.retain(|tag| {
                tag.effective_timestamp()
                    .is_some_and(|timestamp| timestamp < cutoff)
            });
        }

        candidates
    }
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>, AppError> {
    match pattern {
        Some(pattern) if !pattern.is_empty() => Ok(Some(Regex::new(pattern)?)),
        _ => Ok(None),
    }
}
