use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::budget::TimeoutBudget;
use crate::deleter::{BatchError, BulkTagDeleter};
use crate::models::{CleanupResult, PolicyParams};
use crate::pager::TagPager;
use crate::policy::RetentionPolicy;
use crate::registry::Registry;

pub const TIMEOUT_MESSAGE: &str = "timed out while deleting tags";

/// Drives one cleanup run: fetch a page, evaluate the policy against it,
/// delete the page's candidates, repeat until the listing is exhausted or
/// the budget runs out.
///
/// Strictly sequential; concurrent runs against the same repository must be
/// serialized by the caller.
pub struct CleanupOrchestrator<'a> {
    registry: &'a dyn Registry,
    timeout: Duration,
}

impl<'a> CleanupOrchestrator<'a> {
    pub fn new(registry: &'a dyn Registry, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Run the cleanup to completion. Every failure mode resolves into the
    /// returned result; callers never see an `Err`.
    pub async fn execute(&self, repository: &str, params: &PolicyParams) -> CleanupResult {
        let policy = match RetentionPolicy::new(params) {
            Ok(policy) => policy,
            Err(e) => return CleanupResult::error(BTreeSet::new(), 0, e.to_string()),
        };

        let budget = if params.disable_timeout {
            TimeoutBudget::unlimited()
        } else {
            TimeoutBudget::new(self.timeout)
        };

        let deleter = BulkTagDeleter::new(self.registry, repository);
        let mut pager = TagPager::new(self.registry, repository, params.page_size);

        let mut deleted_tags: BTreeSet<String> = BTreeSet::new();
        let mut original_size = 0;

        loop {
            if budget.has_expired() {
                return CleanupResult::error(deleted_tags, original_size, TIMEOUT_MESSAGE);
            }

            let page = match pager.next_page().await {
                None => break,
                Some(Ok(page)) => page,
                Some(Err(e)) => {
                    warn!(repository, error = %e, "tag listing failed");
                    return CleanupResult::error(
                        deleted_tags,
                        original_size,
                        format!("failed to list tags: {}", e),
                    );
                }
            };

            original_size += page.tags.len();

            let names: Vec<String> = policy
                .deletion_set(&page.tags, Utc::now())
                .into_iter()
                .map(|tag| tag.name)
                .collect();
            debug!(
                repository,
                page = page.tags.len(),
                candidates = names.len(),
                "evaluated retention policy"
            );

            let outcome = deleter.delete_batch(&names, &budget).await;
            deleted_tags.extend(outcome.deleted);

            if let Some(error) = outcome.error {
                return match error {
                    BatchError::TimedOut => {
                        CleanupResult::error(deleted_tags, original_size, TIMEOUT_MESSAGE)
                    }
                    BatchError::AllFailed { message } => {
                        CleanupResult::error(deleted_tags, original_size, message)
                    }
                    BatchError::Transport { kind, message } => {
                        let mut result =
                            CleanupResult::error(deleted_tags, original_size, message);
                        result.exception_kind = Some(kind);
                        result
                    }
                };
            }
        }

        info!(
            repository,
            deleted = deleted_tags.len(),
            seen = original_size,
            "cleanup finished"
        );
        CleanupResult::success(deleted_tags, original_size)
    }
}
