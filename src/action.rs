use crate::pagination::{Direction, Page};
use crate::types::{CreatedIssue, IssueSummary, RepositorySummary, UserSummary};

/// Messages driving `App::update`. Fetch completions carry the load token
/// issued when the request was spawned; completions with a stale token are
/// dropped on arrival.
#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    ScrollUp,
    ScrollDown,
    Select,

    // Search view
    FocusInput,
    FocusResults,
    SearchInput(char),
    SearchBackspace,
    SubmitSearch,
    UsersLoaded(Vec<UserSummary>, u64),
    SearchFailed(String, u64),

    // Pagination
    NextPage,
    PrevPage,
    ReposLoaded(Page<RepositorySummary>, Option<Direction>, u64),
    ReposFailed(String, u64),
    IssuesLoaded(Page<IssueSummary>, Option<Direction>, u64),
    IssuesFailed(String, u64),

    // Issue creation flow
    OpenIssueModal,
    CancelIssueModal,
    ModalInput(char),
    ModalBackspace,
    ModalSwitchField,
    SubmitIssue,
    IssueCreated(CreatedIssue),
    IssueCreateFailed(String),

    // Desktop integration
    OpenInBrowser,
    YankUrl,

    None,
}
