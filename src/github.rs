use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{HubbleError, Result};
use crate::gateway::Gateway;
use crate::pagination::{Page, PageInfo, PageParams};
use crate::types::{CreatedIssue, IssueSummary, RepositorySummary, UserSummary, WebTarget};

const SEARCH_USERS: &str = r#"
query SearchUsers($query: String!) {
  search(query: $query, type: USER, first: 10) {
    edges {
      node {
        ... on User {
          login
          avatarUrl
          repositories(first: 1) {
            totalCount
          }
        }
      }
    }
  }
}
"#;

const GET_REPOS: &str = r#"
query GetRepos($login: String!, $first: Int, $last: Int, $after: String, $before: String) {
  user(login: $login) {
    repositories(first: $first, last: $last, after: $after, before: $before) {
      edges {
        node {
          id
          name
          description
          stargazerCount
          watchers {
            totalCount
          }
        }
      }
      totalCount
      pageInfo {
        hasNextPage
        hasPreviousPage
        endCursor
        startCursor
      }
    }
  }
}
"#;

const GET_REPOSITORY_ISSUES: &str = r#"
query GetRepositoryIssues($owner: String!, $repoName: String!, $first: Int, $after: String, $before: String, $last: Int) {
  repository(owner: $owner, name: $repoName) {
    issues(first: $first, after: $after, before: $before, last: $last, states: OPEN) {
      totalCount
      edges {
        node {
          title
          createdAt
          author {
            login
          }
        }
      }
      pageInfo {
        hasNextPage
        hasPreviousPage
        endCursor
        startCursor
      }
    }
  }
}
"#;

const CREATE_ISSUE: &str = r#"
mutation CreateIssue($repositoryId: ID!, $title: String!, $body: String) {
  createIssue(input: { repositoryId: $repositoryId, title: $title, body: $body }) {
    issue {
      id
      title
    }
  }
}
"#;

pub struct GitHubGateway {
    client: Octocrab,
}

impl std::fmt::Debug for GitHubGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubGateway").finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for HubbleError {
    fn from(err: octocrab::Error) -> Self {
        HubbleError::Api(err.to_string())
    }
}

impl GitHubGateway {
    pub fn new(token: String, base_uri: Option<&str>) -> Result<Self> {
        let builder = Octocrab::builder().personal_token(token);
        let builder = match base_uri {
            Some(uri) => builder
                .base_uri(uri)
                .map_err(|e| HubbleError::Auth(e.to_string()))?,
            None => builder,
        };
        let client = builder
            .build()
            .map_err(|e| HubbleError::Auth(e.to_string()))?;
        Ok(Self { client })
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let payload = json!({ "query": query, "variables": variables });
        let envelope: Envelope<T> = self.client.graphql(&payload).await?;
        envelope.into_data()
    }
}

#[async_trait]
impl Gateway for GitHubGateway {
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        debug!(query, "searching users");
        let data: SearchData = self.graphql(SEARCH_USERS, json!({ "query": query })).await?;
        Ok(collect_users(data))
    }

    async fn list_repositories(
        &self,
        login: &str,
        page: &PageParams,
    ) -> Result<Page<RepositorySummary>> {
        debug!(login, ?page, "fetching repository page");
        let variables = json!({
            "login": login,
            "first": page.first,
            "last": page.last,
            "after": page.after,
            "before": page.before,
        });
        let data: ReposData = self.graphql(GET_REPOS, variables).await?;
        Ok(map_repositories(data))
    }

    async fn list_open_issues(
        &self,
        owner: &str,
        name: &str,
        page: &PageParams,
    ) -> Result<Page<IssueSummary>> {
        debug!(owner, name, ?page, "fetching issue page");
        let variables = json!({
            "owner": owner,
            "repoName": name,
            "first": page.first,
            "after": page.after,
            "before": page.before,
            "last": page.last,
        });
        let data: IssuesData = self.graphql(GET_REPOSITORY_ISSUES, variables).await?;
        Ok(map_issues(data))
    }

    async fn create_issue(
        &self,
        repository_id: &str,
        title: &str,
        body: &str,
    ) -> Result<CreatedIssue> {
        debug!(repository_id, title, "creating issue");
        let variables = json!({
            "repositoryId": repository_id,
            "title": title,
            "body": body,
        });
        let data: CreateIssueData = self.graphql(CREATE_ISSUE, variables).await?;
        Ok(CreatedIssue {
            id: data.create_issue.issue.id,
            title: data.create_issue.issue.title,
        })
    }

    fn web_url(&self, target: &WebTarget) -> String {
        match target {
            WebTarget::UserSearch { query } => format!(
                "https://github.com/search?q={}&type=users",
                urlencoding::encode(query)
            ),
            WebTarget::User { login } => format!("https://github.com/{}", login),
            WebTarget::Repository { owner, name } => {
                format!("https://github.com/{}/{}", owner, name)
            }
            WebTarget::Issues { owner, name } => {
                format!("https://github.com/{}/{}/issues", owner, name)
            }
        }
    }
}

// Wire types. GitHub's GraphQL responses arrive camelCased inside the
// standard { data, errors } envelope.

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<T> Envelope<T> {
    fn into_data(self) -> Result<T> {
        if let Some(errors) = self.errors {
            let joined = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(HubbleError::Api(joined));
        }
        self.data
            .ok_or_else(|| HubbleError::Api("response missing data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchData {
    search: SearchConnection,
}

#[derive(Debug, Deserialize)]
struct SearchConnection {
    edges: Vec<SearchEdge>,
}

// The inline fragment means non-User nodes in the search connection
// deserialize as empty objects; every field has to tolerate absence.
#[derive(Debug, Deserialize)]
struct SearchEdge {
    node: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    login: Option<String>,
    avatar_url: Option<String>,
    repositories: Option<RepositoryCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryCount {
    total_count: u32,
}

#[derive(Debug, Deserialize)]
struct ReposData {
    user: Option<UserRepositories>,
}

#[derive(Debug, Deserialize)]
struct UserRepositories {
    repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryConnection {
    edges: Vec<RepoEdge>,
    total_count: u32,
    page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
struct RepoEdge {
    node: RepoNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoNode {
    id: String,
    name: String,
    description: Option<String>,
    stargazer_count: u32,
    watchers: WatcherCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WatcherCount {
    total_count: u32,
}

#[derive(Debug, Deserialize)]
struct IssuesData {
    repository: Option<RepositoryIssues>,
}

#[derive(Debug, Deserialize)]
struct RepositoryIssues {
    issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueConnection {
    total_count: u32,
    edges: Vec<IssueEdge>,
    page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
struct IssueEdge {
    node: IssueNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    title: String,
    created_at: DateTime<Utc>,
    author: Option<AuthorNode>,
}

#[derive(Debug, Deserialize)]
struct AuthorNode {
    login: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateIssueData {
    create_issue: CreateIssuePayload,
}

#[derive(Debug, Deserialize)]
struct CreateIssuePayload {
    issue: IssueRef,
}

#[derive(Debug, Deserialize)]
struct IssueRef {
    id: String,
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePageInfo {
    has_next_page: bool,
    has_previous_page: bool,
    end_cursor: Option<String>,
    start_cursor: Option<String>,
}

impl From<WirePageInfo> for PageInfo {
    fn from(info: WirePageInfo) -> Self {
        PageInfo {
            has_next_page: info.has_next_page,
            has_previous_page: info.has_previous_page,
            start_cursor: info.start_cursor,
            end_cursor: info.end_cursor,
        }
    }
}

fn collect_users(data: SearchData) -> Vec<UserSummary> {
    data.search
        .edges
        .into_iter()
        .filter_map(|edge| {
            let node = edge.node?;
            Some(UserSummary {
                login: node.login?,
                avatar_url: node.avatar_url.unwrap_or_default(),
                repository_count: node.repositories.map(|r| r.total_count).unwrap_or(0),
            })
        })
        .collect()
}

fn map_repositories(data: ReposData) -> Page<RepositorySummary> {
    let Some(user) = data.user else {
        // Unknown login: an empty page, not an error.
        return Page::default();
    };
    let connection = user.repositories;
    let items = connection
        .edges
        .into_iter()
        .map(|edge| RepositorySummary {
            id: edge.node.id,
            name: edge.node.name,
            description: edge.node.description,
            stargazer_count: edge.node.stargazer_count,
            watcher_count: edge.node.watchers.total_count,
        })
        .collect();
    Page {
        items,
        total_count: connection.total_count,
        page_info: connection.page_info.into(),
    }
}

fn map_issues(data: IssuesData) -> Page<IssueSummary> {
    let Some(repository) = data.repository else {
        return Page::default();
    };
    let connection = repository.issues;
    let items = connection
        .edges
        .into_iter()
        .map(|edge| IssueSummary {
            title: edge.node.title,
            created_at: edge.node.created_at,
            author_login: edge.node.author.map(|a| a.login),
        })
        .collect();
    Page {
        items,
        total_count: connection.total_count,
        page_info: connection.page_info.into(),
    }
}
