//! Action-submission collaborator.
//!
//! Reply actions (accept/deny/dismiss) are built in `meowbot_core` and handed
//! to an [`ActionSubmitter`]. Submissions are independent network calls;
//! failures are returned to the caller and never retried.

mod http;

use async_trait::async_trait;

use meowbot_core::error::Result;
use meowbot_core::protocol::ActionRequest;

pub use http::HttpActionSubmitter;

#[async_trait]
pub trait ActionSubmitter: Send + Sync {
    /// Submit `req` and return the backend's raw response text.
    async fn submit(&self, req: &ActionRequest) -> Result<String>;
}
