// Slack Web API client: token validation, message search, message deletion.
//
// The client speaks to three endpoints (auth.test, search.messages,
// chat.delete). Everything above it talks to the `MessagingApi` trait so
// the pipeline can be exercised without a workspace.

pub mod client;
pub mod error;
pub mod permalink;
pub mod traits;
