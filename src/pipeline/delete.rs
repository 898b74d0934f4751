// Bulk delete over a selection of previously ranked results.
//
// Each selected id is looked up in the caller's result list and deleted on
// its own. A failure is logged and counted, never raised. The caller owns
// the result list and decides what to drop from it afterwards.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::models::ScoredMessage;
use crate::slack::traits::MessagingApi;

/// What happened to each selected id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteSummary {
    /// Ids deleted successfully, in attempt order.
    pub deleted_ids: Vec<String>,
    /// (id, error) for each failed delete.
    pub failed: Vec<(String, String)>,
    /// Selected ids with no matching result.
    pub not_found: Vec<String>,
}

impl BulkDeleteSummary {
    /// Number of successful deletions.
    pub fn deleted(&self) -> usize {
        self.deleted_ids.len()
    }
}

/// Delete every selected message, one at a time, in selection order.
///
/// Duplicate ids in `selected` are attempted once.
pub async fn delete_selected(
    messaging: &dyn MessagingApi,
    results: &[ScoredMessage],
    selected: &[String],
) -> BulkDeleteSummary {
    let mut summary = BulkDeleteSummary::default();
    let mut attempted = HashSet::new();

    for id in selected {
        if !attempted.insert(id.as_str()) {
            continue;
        }

        let Some(message) = results.iter().find(|m| &m.id == id) else {
            warn!(id = %id, "Selected message not in results, skipping");
            summary.not_found.push(id.clone());
            continue;
        };

        match messaging.delete_message(&message.permalink).await {
            Ok(_) => summary.deleted_ids.push(id.clone()),
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to delete message, skipping");
                summary.failed.push((id.clone(), e.to_string()));
            }
        }
    }

    info!(
        deleted = summary.deleted(),
        failed = summary.failed.len(),
        not_found = summary.not_found.len(),
        "Bulk delete complete"
    );

    summary
}
