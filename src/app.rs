use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::action::Action;
use crate::error::HubbleError;
use crate::gateway::Gateway;
use crate::pagination::{Direction, PageParams, Pager};
use crate::tui::Event;
use crate::types::{IssueSummary, RepositorySummary, SelectedRepo, UserSummary, WebTarget};

pub const REPO_PAGE_SIZE: u32 = 5;
pub const ISSUE_PAGE_SIZE: u32 = 6;

/// Which view currently fills the screen. Derived from the selection state:
/// issues require a selected repository, repositories a selected user, so a
/// deeper view can never outlive the selection it hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    Repositories,
    Issues,
}

/// Loading/error state owned by one view. An error here never disturbs the
/// other views.
#[derive(Debug, Default)]
pub struct ViewStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Focus inside the search screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
    #[default]
    Input,
    Results,
}

/// Field focus inside the creation modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraftField {
    #[default]
    Title,
    Body,
}

/// Unsaved issue content; exists only while the modal is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
    pub field: DraftField,
}

/// Creation flow: Closed -> Editing -> Submitting -> Closed on success, or
/// back to Editing with the error surfaced and the draft intact.
#[derive(Debug, Default)]
pub enum IssueModal {
    #[default]
    Closed,
    Editing {
        draft: IssueDraft,
        error: Option<String>,
    },
    Submitting {
        draft: IssueDraft,
    },
}

impl IssueModal {
    pub fn is_open(&self) -> bool {
        !matches!(self, IssueModal::Closed)
    }
}

pub struct App {
    // Search view
    pub query: String,
    pub search_focus: SearchFocus,
    pub users: Vec<UserSummary>,
    pub user_index: usize,
    pub search_status: ViewStatus,

    // Repository view
    pub selected_login: Option<String>,
    pub repos: Vec<RepositorySummary>,
    pub repo_index: usize,
    pub repo_pager: Pager,
    pub repo_status: ViewStatus,

    // Issue view
    pub selected_repo: Option<SelectedRepo>,
    pub issues: Vec<IssueSummary>,
    pub issue_index: usize,
    pub issue_pager: Pager,
    pub issue_status: ViewStatus,

    // Creation flow
    pub modal: IssueModal,

    pub should_quit: bool,

    // Stale-response guards: one monotonic token per fetching view. A
    // completion is applied only if it carries the latest token.
    search_seq: u64,
    repo_seq: u64,
    issue_seq: u64,

    gateway: Arc<dyn Gateway>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        action_tx: mpsc::UnboundedSender<Action>,
        initial_query: Option<String>,
    ) -> Self {
        Self {
            query: initial_query.unwrap_or_default(),
            search_focus: SearchFocus::default(),
            users: Vec::new(),
            user_index: 0,
            search_status: ViewStatus::default(),

            selected_login: None,
            repos: Vec::new(),
            repo_index: 0,
            repo_pager: Pager::new(REPO_PAGE_SIZE),
            repo_status: ViewStatus::default(),

            selected_repo: None,
            issues: Vec::new(),
            issue_index: 0,
            issue_pager: Pager::new(ISSUE_PAGE_SIZE),
            issue_status: ViewStatus::default(),

            modal: IssueModal::Closed,

            should_quit: false,

            search_seq: 0,
            repo_seq: 0,
            issue_seq: 0,

            gateway,
            action_tx,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.selected_repo.is_some() {
            Screen::Issues
        } else if self.selected_login.is_some() {
            Screen::Repositories
        } else {
            Screen::Search
        }
    }

    /// Status of whichever view owns the screen right now.
    pub fn current_status(&self) -> &ViewStatus {
        match self.screen() {
            Screen::Search => &self.search_status,
            Screen::Repositories => &self.repo_status,
            Screen::Issues => &self.issue_status,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => {
                if self.query.is_empty() {
                    Action::None
                } else {
                    Action::SubmitSearch
                }
            }
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.modal.is_open() {
            return self.handle_modal_key(key);
        }
        match self.screen() {
            Screen::Search => self.handle_search_key(key),
            Screen::Repositories => self.handle_repo_key(key),
            Screen::Issues => self.handle_issue_key(key),
        }
    }

    fn handle_modal_key(&self, key: KeyEvent) -> Action {
        let editing = matches!(self.modal, IssueModal::Editing { .. });
        match key.code {
            KeyCode::Esc if editing => Action::CancelIssueModal,
            KeyCode::Tab if editing => Action::ModalSwitchField,
            // Submit during Submitting is dropped again in update; the
            // control stays disabled while a request is in flight.
            KeyCode::Enter => Action::SubmitIssue,
            KeyCode::Backspace if editing => Action::ModalBackspace,
            KeyCode::Char(c) if editing && is_text_input(key) => Action::ModalInput(c),
            _ => Action::None,
        }
    }

    fn handle_search_key(&self, key: KeyEvent) -> Action {
        match self.search_focus {
            SearchFocus::Input => match key.code {
                KeyCode::Enter => Action::SubmitSearch,
                KeyCode::Esc => {
                    if self.users.is_empty() {
                        Action::Quit
                    } else {
                        Action::FocusResults
                    }
                }
                KeyCode::Down | KeyCode::Tab => Action::FocusResults,
                KeyCode::Backspace => Action::SearchBackspace,
                KeyCode::Char(c) if is_text_input(key) => Action::SearchInput(c),
                _ => Action::None,
            },
            SearchFocus::Results => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
                KeyCode::Char('/') => Action::FocusInput,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Enter => Action::Select,
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
        }
    }

    fn handle_repo_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    fn handle_issue_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Back,
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('n') | KeyCode::Right => Action::NextPage,
            KeyCode::Char('p') | KeyCode::Left => Action::PrevPage,
            KeyCode::Char('c') => Action::OpenIssueModal,
            KeyCode::Char('o') => Action::OpenInBrowser,
            KeyCode::Char('y') => Action::YankUrl,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen() {
                Screen::Issues => {
                    self.selected_repo = None;
                    self.issues.clear();
                    self.issue_index = 0;
                    self.issue_status = ViewStatus::default();
                    self.modal = IssueModal::Closed;
                }
                Screen::Repositories => {
                    self.selected_login = None;
                    self.repos.clear();
                    self.repo_index = 0;
                    self.repo_status = ViewStatus::default();
                }
                Screen::Search => {
                    self.should_quit = true;
                }
            },
            Action::ScrollUp => match self.screen() {
                Screen::Search => {
                    if self.user_index > 0 {
                        self.user_index -= 1;
                    }
                }
                Screen::Repositories => {
                    if self.repo_index > 0 {
                        self.repo_index -= 1;
                    }
                }
                Screen::Issues => {
                    if self.issue_index > 0 {
                        self.issue_index -= 1;
                    }
                }
            },
            Action::ScrollDown => match self.screen() {
                Screen::Search => {
                    if !self.users.is_empty() && self.user_index < self.users.len() - 1 {
                        self.user_index += 1;
                    }
                }
                Screen::Repositories => {
                    if !self.repos.is_empty() && self.repo_index < self.repos.len() - 1 {
                        self.repo_index += 1;
                    }
                }
                Screen::Issues => {
                    if !self.issues.is_empty() && self.issue_index < self.issues.len() - 1 {
                        self.issue_index += 1;
                    }
                }
            },
            Action::Select => match self.screen() {
                Screen::Search => {
                    if let Some(user) = self.users.get(self.user_index) {
                        self.select_user(user.login.clone());
                    }
                }
                Screen::Repositories => {
                    if let Some(repo) = self.repos.get(self.repo_index) {
                        self.select_repository(repo.name.clone(), repo.id.clone());
                    }
                }
                Screen::Issues => {}
            },

            // Search view
            Action::FocusInput => {
                self.search_focus = SearchFocus::Input;
            }
            Action::FocusResults => {
                if !self.users.is_empty() {
                    self.search_focus = SearchFocus::Results;
                }
            }
            Action::SearchInput(c) => {
                self.query.push(c);
            }
            Action::SearchBackspace => {
                self.query.pop();
            }
            Action::SubmitSearch => {
                self.spawn_search();
            }
            Action::UsersLoaded(users, load_id) => {
                if load_id != self.search_seq {
                    return;
                }
                self.search_status.loading = false;
                self.users = users;
                self.user_index = 0;
                if !self.users.is_empty() {
                    self.search_focus = SearchFocus::Results;
                }
            }
            Action::SearchFailed(message, load_id) => {
                if load_id != self.search_seq {
                    return;
                }
                self.search_status.loading = false;
                self.search_status.error = Some(message);
            }

            // Pagination
            Action::NextPage => match self.screen() {
                Screen::Repositories => {
                    if let Some(params) = self.repo_pager.next() {
                        self.spawn_load_repos(params, Some(Direction::Forward));
                    }
                }
                Screen::Issues => {
                    if let Some(params) = self.issue_pager.next() {
                        self.spawn_load_issues(params, Some(Direction::Forward));
                    }
                }
                Screen::Search => {}
            },
            Action::PrevPage => match self.screen() {
                Screen::Repositories => {
                    if let Some(params) = self.repo_pager.previous() {
                        self.spawn_load_repos(params, Some(Direction::Backward));
                    }
                }
                Screen::Issues => {
                    if let Some(params) = self.issue_pager.previous() {
                        self.spawn_load_issues(params, Some(Direction::Backward));
                    }
                }
                Screen::Search => {}
            },
            Action::ReposLoaded(page, direction, load_id) => {
                if load_id != self.repo_seq {
                    return;
                }
                self.repo_status.loading = false;
                self.repo_pager.absorb(direction, page.total_count, page.page_info);
                self.repos = page.items;
                self.repo_index = 0;
            }
            Action::ReposFailed(message, load_id) => {
                if load_id != self.repo_seq {
                    return;
                }
                self.repo_status.loading = false;
                self.repo_status.error = Some(message);
            }
            Action::IssuesLoaded(page, direction, load_id) => {
                if load_id != self.issue_seq {
                    return;
                }
                self.issue_status.loading = false;
                self.issue_pager.absorb(direction, page.total_count, page.page_info);
                self.issues = page.items;
                self.issue_index = 0;
            }
            Action::IssuesFailed(message, load_id) => {
                if load_id != self.issue_seq {
                    return;
                }
                self.issue_status.loading = false;
                self.issue_status.error = Some(message);
            }

            // Issue creation flow
            Action::OpenIssueModal => {
                if self.selected_repo.is_some() && !self.modal.is_open() {
                    self.modal = IssueModal::Editing {
                        draft: IssueDraft::default(),
                        error: None,
                    };
                    self.refresh_issues();
                }
            }
            Action::CancelIssueModal => {
                if matches!(self.modal, IssueModal::Editing { .. }) {
                    self.modal = IssueModal::Closed;
                    self.refresh_issues();
                }
            }
            Action::ModalInput(c) => {
                if let IssueModal::Editing { draft, .. } = &mut self.modal {
                    match draft.field {
                        DraftField::Title => draft.title.push(c),
                        DraftField::Body => draft.body.push(c),
                    }
                }
            }
            Action::ModalBackspace => {
                if let IssueModal::Editing { draft, .. } = &mut self.modal {
                    match draft.field {
                        DraftField::Title => {
                            draft.title.pop();
                        }
                        DraftField::Body => {
                            draft.body.pop();
                        }
                    }
                }
            }
            Action::ModalSwitchField => {
                if let IssueModal::Editing { draft, .. } = &mut self.modal {
                    draft.field = match draft.field {
                        DraftField::Title => DraftField::Body,
                        DraftField::Body => DraftField::Title,
                    };
                }
            }
            Action::SubmitIssue => {
                self.submit_issue();
            }
            Action::IssueCreated(issue) => {
                info!(id = %issue.id, title = %issue.title, "issue created");
                if matches!(self.modal, IssueModal::Submitting { .. }) {
                    self.modal = IssueModal::Closed;
                    self.refresh_issues();
                }
            }
            Action::IssueCreateFailed(message) => {
                match std::mem::take(&mut self.modal) {
                    IssueModal::Submitting { draft } => {
                        self.modal = IssueModal::Editing {
                            draft,
                            error: Some(message),
                        };
                    }
                    other => self.modal = other,
                }
            }

            // Desktop integration
            Action::OpenInBrowser => {
                if let Some(url) = self.current_url() {
                    if let Err(e) = open::that(&url) {
                        warn!(error = %e, url = %url, "failed to open browser");
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.current_url() {
                    if let Err(e) =
                        arboard::Clipboard::new().and_then(|mut c| c.set_text(url.clone()))
                    {
                        warn!(error = %e, url = %url, "failed to copy url");
                    }
                }
            }

            Action::None => {}
        }
    }

    /// Pure local transition: reveal the repository list for a login and
    /// drop everything that derived from the previous user.
    fn select_user(&mut self, login: String) {
        self.selected_login = Some(login);
        self.selected_repo = None;
        self.modal = IssueModal::Closed;

        self.repos.clear();
        self.repo_index = 0;
        self.repo_pager = Pager::new(REPO_PAGE_SIZE);
        self.repo_status = ViewStatus::default();

        self.issues.clear();
        self.issue_index = 0;
        self.issue_pager = Pager::new(ISSUE_PAGE_SIZE);
        self.issue_status = ViewStatus::default();

        let params = self.repo_pager.first_page();
        self.spawn_load_repos(params, None);
    }

    fn select_repository(&mut self, name: String, id: String) {
        self.selected_repo = Some(SelectedRepo { name, id });
        self.issues.clear();
        self.issue_index = 0;
        self.issue_pager = Pager::new(ISSUE_PAGE_SIZE);
        self.issue_status = ViewStatus::default();

        let params = self.issue_pager.first_page();
        self.spawn_load_issues(params, None);
    }

    /// Refetch the issue list with first-page variables. Runs on every
    /// open/closed transition of the creation modal.
    fn refresh_issues(&mut self) {
        if self.selected_repo.is_none() {
            return;
        }
        let params = self.issue_pager.first_page();
        self.spawn_load_issues(params, None);
    }

    fn submit_issue(&mut self) {
        let draft = match &mut self.modal {
            IssueModal::Editing { draft, error } => {
                if draft.title.trim().is_empty() {
                    *error = Some(
                        HubbleError::Validation("title is required".to_string()).to_string(),
                    );
                    return;
                }
                draft.clone()
            }
            // Closed, or a submission already in flight.
            _ => return,
        };
        let Some(repo) = self.selected_repo.clone() else {
            return;
        };
        self.modal = IssueModal::Submitting {
            draft: draft.clone(),
        };
        self.spawn_create_issue(repo.id, draft);
    }

    fn current_url(&self) -> Option<String> {
        let target = match self.screen() {
            Screen::Search => {
                if let Some(user) = self.users.get(self.user_index) {
                    WebTarget::User {
                        login: user.login.clone(),
                    }
                } else if !self.query.is_empty() {
                    WebTarget::UserSearch {
                        query: self.query.clone(),
                    }
                } else {
                    return None;
                }
            }
            Screen::Repositories => {
                let login = self.selected_login.clone()?;
                match self.repos.get(self.repo_index) {
                    Some(repo) => WebTarget::Repository {
                        owner: login,
                        name: repo.name.clone(),
                    },
                    None => WebTarget::User { login },
                }
            }
            Screen::Issues => {
                let login = self.selected_login.clone()?;
                let repo = self.selected_repo.as_ref()?;
                WebTarget::Issues {
                    owner: login,
                    name: repo.name.clone(),
                }
            }
        };
        Some(self.gateway.web_url(&target))
    }

    fn spawn_search(&mut self) {
        self.search_seq += 1;
        let load_id = self.search_seq;
        self.search_status.loading = true;
        self.search_status.error = None;

        let query = self.query.clone();
        let gateway = Arc::clone(&self.gateway);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match gateway.search_users(&query).await {
                Ok(users) => tx.send(Action::UsersLoaded(users, load_id)).ok(),
                Err(e) => tx.send(Action::SearchFailed(e.to_string(), load_id)).ok(),
            };
        });
    }

    fn spawn_load_repos(&mut self, params: PageParams, direction: Option<Direction>) {
        let Some(login) = self.selected_login.clone() else {
            return;
        };
        self.repo_seq += 1;
        let load_id = self.repo_seq;
        self.repo_status.loading = true;
        self.repo_status.error = None;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match gateway.list_repositories(&login, &params).await {
                Ok(page) => tx.send(Action::ReposLoaded(page, direction, load_id)).ok(),
                Err(e) => tx.send(Action::ReposFailed(e.to_string(), load_id)).ok(),
            };
        });
    }

    fn spawn_load_issues(&mut self, params: PageParams, direction: Option<Direction>) {
        let (Some(owner), Some(repo)) = (self.selected_login.clone(), self.selected_repo.clone())
        else {
            return;
        };
        self.issue_seq += 1;
        let load_id = self.issue_seq;
        self.issue_status.loading = true;
        self.issue_status.error = None;

        let gateway = Arc::clone(&self.gateway);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match gateway.list_open_issues(&owner, &repo.name, &params).await {
                Ok(page) => tx.send(Action::IssuesLoaded(page, direction, load_id)).ok(),
                Err(e) => tx.send(Action::IssuesFailed(e.to_string(), load_id)).ok(),
            };
        });
    }

    fn spawn_create_issue(&mut self, repository_id: String, draft: IssueDraft) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match gateway
                .create_issue(&repository_id, &draft.title, &draft.body)
                .await
            {
                Ok(issue) => tx.send(Action::IssueCreated(issue)).ok(),
                Err(e) => tx.send(Action::IssueCreateFailed(e.to_string())).ok(),
            };
        });
    }
}

/// Plain character input: no modifiers beyond shift.
fn is_text_input(key: KeyEvent) -> bool {
    key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::error::Result;
    use crate::pagination::{Page, PageInfo};
    use crate::types::CreatedIssue;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SearchUsers {
            query: String,
        },
        ListRepositories {
            login: String,
            page: PageParams,
        },
        ListOpenIssues {
            owner: String,
            name: String,
            page: PageParams,
        },
        CreateIssue {
            repository_id: String,
            title: String,
            body: String,
        },
    }

    /// Canned gateway: one user, a two-page repository connection split on
    /// the "cur-1" cursor, one issue. Records every call it receives.
    #[derive(Debug, Default)]
    struct FakeGateway {
        calls: Mutex<Vec<Call>>,
        fail_create: bool,
    }

    impl FakeGateway {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn create_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, Call::CreateIssue { .. }))
                .count()
        }

        fn repo(name: &str) -> RepositorySummary {
            RepositorySummary {
                id: format!("R_{}", name),
                name: name.to_string(),
                description: None,
                stargazer_count: 0,
                watcher_count: 0,
            }
        }
    }

    #[async_trait::async_trait]
    impl Gateway for FakeGateway {
        async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
            self.calls.lock().unwrap().push(Call::SearchUsers {
                query: query.to_string(),
            });
            Ok(vec![UserSummary {
                login: "octocat".to_string(),
                avatar_url: String::new(),
                repository_count: 8,
            }])
        }

        async fn list_repositories(
            &self,
            login: &str,
            page: &PageParams,
        ) -> Result<Page<RepositorySummary>> {
            self.calls.lock().unwrap().push(Call::ListRepositories {
                login: login.to_string(),
                page: page.clone(),
            });
            if page.after.as_deref() == Some("cur-1") {
                Ok(Page {
                    items: vec![Self::repo("page-two")],
                    total_count: 6,
                    page_info: PageInfo {
                        has_next_page: false,
                        has_previous_page: true,
                        start_cursor: Some("cur-2".to_string()),
                        end_cursor: Some("cur-2".to_string()),
                    },
                })
            } else {
                Ok(Page {
                    items: vec![Self::repo("page-one")],
                    total_count: 6,
                    page_info: PageInfo {
                        has_next_page: true,
                        has_previous_page: false,
                        start_cursor: Some("cur-0".to_string()),
                        end_cursor: Some("cur-1".to_string()),
                    },
                })
            }
        }

        async fn list_open_issues(
            &self,
            owner: &str,
            name: &str,
            page: &PageParams,
        ) -> Result<Page<IssueSummary>> {
            self.calls.lock().unwrap().push(Call::ListOpenIssues {
                owner: owner.to_string(),
                name: name.to_string(),
                page: page.clone(),
            });
            Ok(Page {
                items: vec![IssueSummary {
                    title: "first issue".to_string(),
                    created_at: chrono::Utc::now(),
                    author_login: Some("octocat".to_string()),
                }],
                total_count: 1,
                page_info: PageInfo::default(),
            })
        }

        async fn create_issue(
            &self,
            repository_id: &str,
            title: &str,
            body: &str,
        ) -> Result<CreatedIssue> {
            self.calls.lock().unwrap().push(Call::CreateIssue {
                repository_id: repository_id.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            });
            if self.fail_create {
                return Err(HubbleError::Api("boom".to_string()));
            }
            Ok(CreatedIssue {
                id: "I_1".to_string(),
                title: title.to_string(),
            })
        }

        fn web_url(&self, _target: &WebTarget) -> String {
            "https://example.invalid".to_string()
        }
    }

    fn fixture() -> (App, Arc<FakeGateway>, mpsc::UnboundedReceiver<Action>) {
        let gateway = Arc::new(FakeGateway::default());
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(gateway.clone(), tx, None);
        (app, gateway, rx)
    }

    /// Drive the flow up to a loaded repository list for "octocat".
    async fn select_octocat(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        for c in "octocat".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SubmitSearch);
        let users = rx.recv().await.unwrap();
        app.update(users);
        app.update(Action::Select);
        let repos = rx.recv().await.unwrap();
        app.update(repos);
    }

    /// Drill one level further, into the repository's issue list.
    async fn open_issue_list(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Action>) {
        app.update(Action::Select);
        let issues = rx.recv().await.unwrap();
        app.update(issues);
    }

    #[tokio::test]
    async fn search_then_select_fetches_first_repo_page() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;

        assert_eq!(app.users[0].login, "octocat");
        assert_eq!(app.screen(), Screen::Repositories);
        assert_eq!(app.repos[0].name, "page-one");
        assert_eq!(app.repo_pager.current_page(), 1);
        assert_eq!(app.repo_pager.total_pages(), 2);

        let calls = gateway.calls();
        assert!(calls.contains(&Call::SearchUsers {
            query: "octocat".into()
        }));
        assert_eq!(
            calls.last().unwrap(),
            &Call::ListRepositories {
                login: "octocat".into(),
                page: PageParams::first_page(5),
            }
        );
    }

    #[tokio::test]
    async fn next_then_prev_returns_to_the_first_page() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        let first = app.repos.clone();

        app.update(Action::NextPage);
        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        assert_eq!(app.repos[0].name, "page-two");
        assert_eq!(app.repo_pager.current_page(), 2);

        app.update(Action::PrevPage);
        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        assert_eq!(app.repos, first);
        assert_eq!(app.repo_pager.current_page(), 1);

        // Each transition used only its own direction's cursor.
        let calls = gateway.calls();
        assert!(calls.contains(&Call::ListRepositories {
            login: "octocat".into(),
            page: PageParams::forward(5, "cur-1".into()),
        }));
        assert!(calls.contains(&Call::ListRepositories {
            login: "octocat".into(),
            page: PageParams::backward(5, "cur-2".into()),
        }));
    }

    #[tokio::test]
    async fn page_navigation_without_the_flag_is_a_noop() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;

        // First page: no previous page to go to.
        let before = gateway.calls().len();
        app.update(Action::PrevPage);
        assert_eq!(gateway.calls().len(), before);
        assert_eq!(app.repo_pager.current_page(), 1);

        // Last page: no next page to go to.
        app.update(Action::NextPage);
        let loaded = rx.recv().await.unwrap();
        app.update(loaded);
        let before = gateway.calls().len();
        app.update(Action::NextPage);
        assert_eq!(gateway.calls().len(), before);
        assert_eq!(app.repo_pager.current_page(), 2);
    }

    #[tokio::test]
    async fn selecting_a_new_user_drops_the_previous_drill_down() {
        let (mut app, _gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;
        assert_eq!(app.screen(), Screen::Issues);

        app.select_user("hubber".to_string());
        assert_eq!(app.screen(), Screen::Repositories);
        assert!(app.selected_repo.is_none());
        assert!(app.issues.is_empty());
        assert!(app.repos.is_empty());

        let loaded = rx.recv().await.unwrap();
        assert!(matches!(loaded, Action::ReposLoaded(..)));
    }

    #[tokio::test]
    async fn empty_title_submit_is_rejected_locally() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;

        app.update(Action::OpenIssueModal);
        let refresh = rx.recv().await.unwrap();
        app.update(refresh);

        app.update(Action::SubmitIssue);
        assert_eq!(gateway.create_calls(), 0);
        match &app.modal {
            IssueModal::Editing { error, .. } => {
                assert_eq!(error.as_deref(), Some("title is required"));
            }
            other => panic!("modal should stay open, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn successful_creation_closes_modal_and_refetches_first_page() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;

        app.update(Action::OpenIssueModal);
        let refresh = rx.recv().await.unwrap();
        app.update(refresh);

        for c in "Bug".chars() {
            app.update(Action::ModalInput(c));
        }
        app.update(Action::SubmitIssue);
        assert!(matches!(app.modal, IssueModal::Submitting { .. }));

        // A second submit while one is in flight is ignored.
        app.update(Action::SubmitIssue);

        let created = rx.recv().await.unwrap();
        assert!(matches!(created, Action::IssueCreated(_)));
        app.update(created);
        assert!(matches!(app.modal, IssueModal::Closed));

        let refreshed = rx.recv().await.unwrap();
        app.update(refreshed);

        let calls = gateway.calls();
        assert!(calls.contains(&Call::CreateIssue {
            repository_id: "R_page-one".into(),
            title: "Bug".into(),
            body: String::new(),
        }));
        assert_eq!(gateway.create_calls(), 1);
        // The refresh went back to first-page variables.
        assert_eq!(
            calls.last().unwrap(),
            &Call::ListOpenIssues {
                owner: "octocat".into(),
                name: "page-one".into(),
                page: PageParams::first_page(6),
            }
        );
        assert_eq!(app.issue_pager.current_page(), 1);
    }

    #[tokio::test]
    async fn cancel_discards_the_draft_and_refreshes() {
        let (mut app, gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;

        app.update(Action::OpenIssueModal);
        let refresh = rx.recv().await.unwrap();
        app.update(refresh);

        for c in "half-written".chars() {
            app.update(Action::ModalInput(c));
        }
        app.update(Action::CancelIssueModal);
        assert!(matches!(app.modal, IssueModal::Closed));
        assert_eq!(gateway.create_calls(), 0);

        let refreshed = rx.recv().await.unwrap();
        assert!(matches!(refreshed, Action::IssuesLoaded(..)));
        app.update(refreshed);

        // Reopening starts from an empty draft.
        app.update(Action::OpenIssueModal);
        match &app.modal {
            IssueModal::Editing { draft, .. } => assert!(draft.title.is_empty()),
            other => panic!("expected an editing modal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_creation_returns_to_editing_with_the_error() {
        let gateway = Arc::new(FakeGateway {
            fail_create: true,
            ..FakeGateway::default()
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = App::new(gateway.clone(), tx, None);
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;

        app.update(Action::OpenIssueModal);
        let refresh = rx.recv().await.unwrap();
        app.update(refresh);

        for c in "Bug".chars() {
            app.update(Action::ModalInput(c));
        }
        app.update(Action::SubmitIssue);

        let failed = rx.recv().await.unwrap();
        assert!(matches!(failed, Action::IssueCreateFailed(_)));
        app.update(failed);

        match &app.modal {
            IssueModal::Editing { draft, error } => {
                assert_eq!(draft.title, "Bug");
                assert!(error.is_some());
            }
            other => panic!("expected an editing modal, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn stale_search_completions_are_discarded() {
        let (mut app, _gateway, _rx) = fixture();
        for c in "octocat".chars() {
            app.update(Action::SearchInput(c));
        }
        app.update(Action::SubmitSearch); // token 1
        app.update(Action::SubmitSearch); // token 2 supersedes it

        // The superseded request resolves late, in both shapes.
        app.update(Action::UsersLoaded(Vec::new(), 1));
        assert!(app.search_status.loading);
        app.update(Action::SearchFailed("late failure".into(), 1));
        assert!(app.search_status.error.is_none());

        // The latest token still lands.
        app.update(Action::UsersLoaded(
            vec![UserSummary {
                login: "octocat".into(),
                avatar_url: String::new(),
                repository_count: 8,
            }],
            2,
        ));
        assert!(!app.search_status.loading);
        assert_eq!(app.users.len(), 1);
    }

    #[tokio::test]
    async fn back_unwinds_one_selection_level_at_a_time() {
        let (mut app, _gateway, mut rx) = fixture();
        select_octocat(&mut app, &mut rx).await;
        open_issue_list(&mut app, &mut rx).await;

        app.update(Action::Back);
        assert_eq!(app.screen(), Screen::Repositories);
        assert!(app.selected_repo.is_none());
        assert!(app.issues.is_empty());

        app.update(Action::Back);
        assert_eq!(app.screen(), Screen::Search);
        assert!(app.selected_login.is_none());

        app.update(Action::Back);
        assert!(app.should_quit);
    }
}
