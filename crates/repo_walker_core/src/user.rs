//! GitHub users and the user accessor.

use std::sync::Arc;

use github_api::{GitHubApi, ListUsersParams};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{deserialize_items, flatten_pages, get_all_pages, Error, ListOptions, Repo, RepoWalker};

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;

/// Represents a GitHub user account.
///
/// # Examples
///
/// ```rust
/// use repo_walker_core::User;
///
/// let user = User::with_login("octocat");
/// assert_eq!(user.login, "octocat");
/// assert_eq!(user.id, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// The login name of the user
    pub login: String,

    /// The unique numeric ID of the user
    pub id: Option<u64>,

    pub node_id: Option<String>,

    pub avatar_url: Option<String>,

    pub html_url: Option<String>,

    /// `User` or `Organization`
    #[serde(rename = "type")]
    pub user_type: Option<String>,

    pub site_admin: Option<bool>,
}

impl User {
    /// Creates a user known only by its login.
    pub fn with_login(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            ..Default::default()
        }
    }

    /// Lists the repositories of this user.
    ///
    /// Every returned [`Repo`] refers back to this same `Arc<User>`.
    pub async fn get_repos(
        self: &Arc<Self>,
        walker: &RepoWalker,
        options: &ListOptions,
    ) -> Result<Vec<Arc<Repo>>, Error> {
        walker.repos().get_all(self, options).await
    }
}

/// Accessor for GitHub users.
pub struct Users<'a> {
    api: &'a dyn GitHubApi,
}

impl<'a> Users<'a> {
    pub(crate) fn new(api: &'a dyn GitHubApi) -> Self {
        Self { api }
    }

    /// Lists all GitHub users, starting from the first account.
    ///
    /// Without a `count` this walks every page of `/users`, which on
    /// github.com takes a very long time.
    #[instrument(skip(self))]
    pub async fn get_all(&self, options: &ListOptions) -> Result<Vec<Arc<User>>, Error> {
        info!("Fetching all users (this might take a while)");

        let params = ListUsersParams {
            since: Some(0),
            per_page: options.per_page,
        };
        let first = self.api.list_users(&params).await?;
        let pages = get_all_pages(self.api, first, options.count).await?;

        let users: Vec<User> = deserialize_items("user", flatten_pages(pages))?;
        info!(count = users.len(), "Fetched users");

        Ok(users.into_iter().map(Arc::new).collect())
    }
}
