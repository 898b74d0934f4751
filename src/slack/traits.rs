// The messaging seam the pipeline depends on.
//
// `SlackClient` is the production implementation. Tests provide in-memory
// fakes so ranking and bulk-delete behaviour can be checked offline.

use async_trait::async_trait;

use super::client::{DeleteResponse, SearchResponse};
use super::error::MessagingError;
use crate::models::SearchCriteria;

#[async_trait]
pub trait MessagingApi: Send + Sync {
    /// Run one search request built from `criteria`.
    async fn search_messages(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<SearchResponse, MessagingError>;

    /// Delete the message identified by `permalink`.
    async fn delete_message(&self, permalink: &str) -> Result<DeleteResponse, MessagingError>;
}
