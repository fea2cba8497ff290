use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::{Page, PageParams};
use crate::types::{CreatedIssue, IssueSummary, RepositorySummary, UserSummary, WebTarget};

/// The remote GraphQL endpoint, seen through the four documents this
/// application executes. Injected as a trait object so views can be driven
/// by a canned implementation in tests.
#[async_trait]
pub trait Gateway: Send + Sync + std::fmt::Debug {
    /// Search users matching a free-text query. The server decides what an
    /// empty query returns; no validation happens on this side.
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>>;

    /// One page of a user's repositories.
    async fn list_repositories(
        &self,
        login: &str,
        page: &PageParams,
    ) -> Result<Page<RepositorySummary>>;

    /// One page of a repository's open issues.
    async fn list_open_issues(
        &self,
        owner: &str,
        name: &str,
        page: &PageParams,
    ) -> Result<Page<IssueSummary>>;

    /// Create an issue on the repository with the given node id.
    async fn create_issue(&self, repository_id: &str, title: &str, body: &str)
        -> Result<CreatedIssue>;

    /// Browser URL for a view target.
    fn web_url(&self, target: &WebTarget) -> String;
}
