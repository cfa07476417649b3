use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::budget::TimeoutBudget;
use crate::registry::{DeleteTagStatus, Registry};

/// Upper bound on the aggregated failure message. Applied after joining the
/// failed names, not by limiting how many are listed.
const MAX_ERROR_MESSAGE_LENGTH: usize = 1000;

/// Why a batch ended with an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The run's budget expired between deletions.
    TimedOut,
    /// Every attempted deletion failed.
    AllFailed { message: String },
    /// A transport-level exception aborted the batch.
    Transport { kind: String, message: String },
}

/// What one batch of deletions accomplished. `failed` holds tags the server
/// refused; they do not make the batch an error unless nothing succeeded.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub deleted: BTreeSet<String>,
    pub failed: Vec<String>,
    pub error: Option<BatchError>,
}

/// Deletes batches of tags one at a time, in the order given.
///
/// The deletion endpoint offers no atomic bulk operation, so each tag is a
/// separate call and an individual refusal does not stop the batch.
pub struct BulkTagDeleter<'a> {
    registry: &'a dyn Registry,
    repository: &'a str,
}

impl<'a> BulkTagDeleter<'a> {
    pub fn new(registry: &'a dyn Registry, repository: &'a str) -> Self {
        Self {
            registry,
            repository,
        }
    }

    /// Attempt to delete `names` in order, consulting the budget before each
    /// call. On expiry the batch stops where it stands and reports what was
    /// deleted so far.
    pub async fn delete_batch(&self, names: &[String], budget: &TimeoutBudget) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for name in names {
            if budget.has_expired() {
                outcome.error = Some(BatchError::TimedOut);
                return outcome;
            }

            match self.registry.delete_tag(self.repository, name).await {
                Ok(DeleteTagStatus::Deleted) => {
                    debug!(tag = %name, "deleted tag");
                    outcome.deleted.insert(name.clone());
                }
                Ok(DeleteTagStatus::NotFound) => {
                    // Already gone; the goal state is reached either way.
                    debug!(tag = %name, "tag already absent");
                    outcome.deleted.insert(name.clone());
                }
                Ok(DeleteTagStatus::Failed) => {
                    warn!(tag = %name, "tag deletion refused");
                    outcome.failed.push(name.clone());
                }
                Err(e) => {
                    warn!(tag = %name, error = %e, "batch aborted by transport failure");
                    outcome.error = Some(BatchError::Transport {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    });
                    return outcome;
                }
            }
        }

        if !outcome.failed.is_empty() && outcome.deleted.is_empty() {
            outcome.error = Some(BatchError::AllFailed {
                message: failure_message(&outcome.failed),
            });
        }

        outcome
    }
}

/// Join the failed names into one message, bounded to a fixed length.
fn failure_message(failed: &[String]) -> String {
    let mut message = format!("could not delete tags: {}", failed.join(", "));
    if message.len() > MAX_ERROR_MESSAGE_LENGTH {
        let mut cut = MAX_ERROR_MESSAGE_LENGTH;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    message
}
