//! Scripted `GitHubApi` used by the unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use github_api::{
    Error as GitHubError, GitHubApi, ListCommitsParams, ListReposParams, ListUsersParams,
    PageParams, ResponsePage,
};
use serde_json::{json, Value};

use crate::RepoWalker;

/// Mock client answering each operation from its own queue of responses.
///
/// Every call is recorded as `"<operation> <arguments>"` so tests can assert
/// on what was requested and how often.
#[derive(Default)]
pub struct MockGitHubApi {
    responses: Mutex<HashMap<&'static str, VecDeque<Result<ResponsePage, GitHubError>>>>,
    calls: Mutex<Vec<String>>,
}

impl MockGitHubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, operation: &'static str, response: ResponsePage) -> Self {
        self.push(operation, Ok(response));
        self
    }

    pub fn with_error(self, operation: &'static str, error: GitHubError) -> Self {
        self.push(operation, Err(error));
        self
    }

    fn push(&self, operation: &'static str, result: Result<ResponsePage, GitHubError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(operation)
            .or_default()
            .push_back(result);
    }

    fn respond(
        &self,
        operation: &'static str,
        arguments: String,
    ) -> Result<ResponsePage, GitHubError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{operation} {arguments}"));

        self.responses
            .lock()
            .unwrap()
            .get_mut(operation)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(GitHubError::Api {
                    status: 599,
                    message: format!("no scripted response for {operation}"),
                })
            })
    }

    /// Recorded calls of `operation`, arguments only.
    pub fn calls(&self, operation: &str) -> Vec<String> {
        let prefix = format!("{operation} ");
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| call.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.calls(operation).len()
    }
}

#[async_trait]
impl GitHubApi for MockGitHubApi {
    async fn list_users(&self, params: &ListUsersParams) -> Result<ResponsePage, GitHubError> {
        self.respond("list_users", format!("{params:?}"))
    }

    async fn list_repos_for_user(
        &self,
        username: &str,
        params: &ListReposParams,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("list_repos_for_user", format!("{username} {params:?}"))
    }

    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("get_branch", format!("{owner}/{repo} {branch}"))
    }

    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        params: &PageParams,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("list_branches", format!("{owner}/{repo} {params:?}"))
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("get_content", format!("{owner}/{repo} {path} {reference:?}"))
    }

    async fn get_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("get_commit", format!("{owner}/{repo} {sha}"))
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        params: &ListCommitsParams,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("list_commits", format!("{owner}/{repo} {params:?}"))
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        recursive: bool,
    ) -> Result<ResponsePage, GitHubError> {
        self.respond("get_tree", format!("{owner}/{repo} {sha} recursive={recursive}"))
    }

    async fn get_next_page(&self, previous: &ResponsePage) -> Result<ResponsePage, GitHubError> {
        let link = previous.next_page_url().unwrap_or_default().to_string();
        self.respond("get_next_page", link)
    }
}

/// Builds a walker around `api`, keeping a handle for assertions.
pub fn walker(api: MockGitHubApi) -> (RepoWalker, Arc<MockGitHubApi>) {
    let api = Arc::new(api);
    (RepoWalker::new(api.clone()), api)
}

/// A page of `items`, linking to page `next` when given.
pub fn page(items: Value, next: Option<u32>) -> ResponsePage {
    match next {
        Some(n) => ResponsePage::with_link(
            items,
            format!(
                r#"<https://api.github.com/resource?page={n}>; rel="next", <https://api.github.com/resource?page=9>; rel="last""#
            ),
        ),
        None => ResponsePage::new(items),
    }
}

/// `count` numbered objects starting at `start`, e.g. `{"id": 3}`.
pub fn numbered(start: u64, count: u64) -> Value {
    Value::Array((start..start + count).map(|id| json!({ "id": id })).collect())
}

pub fn user_json(login: &str) -> Value {
    json!({ "login": login, "id": 1, "type": "User", "site_admin": false })
}

pub fn repo_json(name: &str) -> Value {
    json!({
        "name": name,
        "full_name": format!("octocat/{name}"),
        "private": false,
        "default_branch": "main"
    })
}

pub fn branch_json(name: &str, sha: &str) -> Value {
    json!({
        "name": name,
        "commit": {
            "sha": sha,
            "url": format!("https://api.github.com/repos/octocat/hello-world/commits/{sha}")
        },
        "protected": false
    })
}
