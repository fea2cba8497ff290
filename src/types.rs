use chrono::{DateTime, Utc};

/// A user matched by the search view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub login: String,
    pub avatar_url: String,
    pub repository_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub stargazer_count: u32,
    pub watcher_count: u32,
}

/// Open issue as shown in the issue list. `author_login` is absent when the
/// author's account no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub author_login: Option<String>,
}

/// Issue returned by the create mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub id: String,
    pub title: String,
}

/// Repository currently drilled into. The node id is what the create
/// mutation wants; the name is what the issue query wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedRepo {
    pub name: String,
    pub id: String,
}

/// Browser destination for the view under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebTarget {
    UserSearch { query: String },
    User { login: String },
    Repository { owner: String, name: String },
    Issues { owner: String, name: String },
}
