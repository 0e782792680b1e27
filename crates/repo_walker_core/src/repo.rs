//! GitHub repositories and the repository accessor.

use std::sync::Arc;

use github_api::{GitHubApi, ListReposParams};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::{
    deserialize_items, flatten_pages, get_all_pages, Branch, Error, ListOptions, RepoWalker, User,
};

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;

/// Repository fields as returned by GitHub.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RepoData {
    /// The name of the repository, without the owner
    pub name: String,

    pub id: Option<u64>,

    /// The full name of the repository (owner/name)
    pub full_name: Option<String>,

    pub description: Option<String>,

    pub private: Option<bool>,

    pub fork: Option<bool>,

    pub default_branch: Option<String>,

    pub html_url: Option<String>,
}

/// A GitHub repository together with the user that owns it.
///
/// The owner is fixed when the repository is created and shared with every
/// repository listed for the same user.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use repo_walker_core::{Repo, RepoData, User};
///
/// let user = Arc::new(User::with_login("octocat"));
/// let repo = Repo::new(
///     RepoData { name: "hello-world".to_string(), ..Default::default() },
///     user.clone(),
/// );
///
/// assert_eq!(repo.name(), "hello-world");
/// assert!(Arc::ptr_eq(repo.user(), &user));
/// ```
#[derive(Clone, Debug)]
pub struct Repo {
    data: RepoData,
    user: Arc<User>,
}

impl Repo {
    pub fn new(data: RepoData, user: Arc<User>) -> Self {
        Self { data, user }
    }

    pub fn data(&self) -> &RepoData {
        &self.data
    }

    /// Returns the name of the repository.
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// The user owning this repository.
    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    /// Gets one branch of this repository, `None` if it does not exist.
    pub async fn get_branch(
        self: &Arc<Self>,
        walker: &RepoWalker,
        name: &str,
    ) -> Result<Option<Branch>, Error> {
        walker.branches().get(&self.user, self, name).await
    }

    /// Lists the branches of this repository.
    pub async fn get_branches(
        self: &Arc<Self>,
        walker: &RepoWalker,
        options: &ListOptions,
    ) -> Result<Vec<Branch>, Error> {
        walker.branches().get_all(&self.user, self, options).await
    }
}

/// Accessor for GitHub repositories.
pub struct Repos<'a> {
    api: &'a dyn GitHubApi,
}

impl<'a> Repos<'a> {
    pub(crate) fn new(api: &'a dyn GitHubApi) -> Self {
        Self { api }
    }

    /// Lists the repositories of `user`.
    ///
    /// Each returned repository holds a clone of `user`, not a copy of the user.
    #[instrument(skip(self, user), fields(user = %user.login))]
    pub async fn get_all(
        &self,
        user: &Arc<User>,
        options: &ListOptions,
    ) -> Result<Vec<Arc<Repo>>, Error> {
        info!("Fetching all repos from user {}", user.login);

        let params = ListReposParams {
            per_page: options.per_page,
            ..Default::default()
        };
        let first = self.api.list_repos_for_user(&user.login, &params).await?;
        let pages = get_all_pages(self.api, first, options.count).await?;

        let repos: Vec<RepoData> = deserialize_items("repository", flatten_pages(pages))?;
        Ok(repos
            .into_iter()
            .map(|data| Arc::new(Repo::new(data, Arc::clone(user))))
            .collect())
    }
}
