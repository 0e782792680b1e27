//! Git branches, the branch accessor and per-branch queries.

use std::sync::Arc;

use github_api::{GitHubApi, ListCommitsParams, PageParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    deserialize_item, deserialize_items, flatten_pages, get_all_pages, retry_on_connection_issues,
    Contents, Error, ListOptions, Repo, RepoWalker, Tree, User,
};

#[cfg(test)]
#[path = "branch_tests.rs"]
mod tests;

/// Branch fields as returned by GitHub.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct BranchData {
    pub name: String,

    /// The commit at the head of the branch
    pub commit: CommitRef,

    #[serde(default)]
    pub protected: Option<bool>,
}

/// A reference to a commit.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommitRef {
    pub sha: String,

    #[serde(default)]
    pub url: Option<String>,
}

/// A branch together with the repository and user it belongs to.
#[derive(Clone, Debug)]
pub struct Branch {
    data: BranchData,
    user: Arc<User>,
    repo: Arc<Repo>,
}

/// Options for [`Branch::get_content`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Path of the file or directory inside the repository.
    pub path: String,

    /// Commit, branch or tag to read from. GitHub uses the default branch when unset.
    pub reference: Option<String>,
}

/// Options for [`Branch::get_commit`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Defaults to the head of the branch.
    pub sha: Option<String>,
}

/// Options for [`Branch::get_commits`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitsOptions {
    /// SHA or branch to start listing from. Defaults to the head of the branch.
    pub sha: Option<String>,

    /// Only commits touching this path.
    pub path: Option<String>,

    /// GitHub login or email address of the author.
    pub author: Option<String>,

    /// ISO 8601 timestamp.
    pub since: Option<String>,

    /// ISO 8601 timestamp.
    pub until: Option<String>,

    pub list: ListOptions,
}

/// Options for [`Branch::get_tree`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeOptions {
    /// Defaults to the head of the branch.
    pub sha: Option<String>,

    pub recursive: bool,
}

impl Branch {
    pub fn new(data: BranchData, user: Arc<User>, repo: Arc<Repo>) -> Self {
        Self { data, user, repo }
    }

    pub fn data(&self) -> &BranchData {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// SHA of the commit at the head of the branch.
    pub fn commit_sha(&self) -> &str {
        &self.data.commit.sha
    }

    pub fn user(&self) -> &Arc<User> {
        &self.user
    }

    pub fn repo(&self) -> &Arc<Repo> {
        &self.repo
    }

    fn owner(&self) -> &str {
        &self.user.login
    }

    /// Picks `sha` when it is set and not empty, the head of the branch otherwise.
    fn sha_or_head<'a>(&'a self, sha: Option<&'a str>) -> &'a str {
        sha.filter(|sha| !sha.is_empty())
            .unwrap_or_else(|| self.commit_sha())
    }

    /// Reads a file or directory from the repository.
    ///
    /// File content is decoded from base64 before it is returned.
    #[instrument(skip(self, walker), fields(branch = %self.name()))]
    pub async fn get_content(
        &self,
        walker: &RepoWalker,
        options: &ContentOptions,
    ) -> Result<Contents, Error> {
        let page = walker
            .api()
            .get_content(
                self.owner(),
                self.repo.name(),
                &options.path,
                options.reference.as_deref(),
            )
            .await?;

        Contents::from_response(page.data)
    }

    /// Gets a single commit, the head of the branch by default.
    pub async fn get_commit(
        &self,
        walker: &RepoWalker,
        options: &CommitOptions,
    ) -> Result<Value, Error> {
        let sha = self.sha_or_head(options.sha.as_deref());
        let page = walker
            .api()
            .get_commit(self.owner(), self.repo.name(), sha)
            .await?;

        Ok(page.data)
    }

    /// Lists commits, starting from the head of the branch by default.
    ///
    /// All pages are fetched unless `options.list.count` is reached.
    #[instrument(skip(self, walker), fields(branch = %self.name()))]
    pub async fn get_commits(
        &self,
        walker: &RepoWalker,
        options: &CommitsOptions,
    ) -> Result<Vec<Value>, Error> {
        let params = ListCommitsParams {
            sha: Some(self.sha_or_head(options.sha.as_deref()).to_string()),
            path: options.path.clone(),
            author: options.author.clone(),
            since: options.since.clone(),
            until: options.until.clone(),
            per_page: options.list.per_page,
        };

        let api = walker.api();
        let first = api
            .list_commits(self.owner(), self.repo.name(), &params)
            .await?;
        let pages = get_all_pages(api, first, options.list.count).await?;

        Ok(flatten_pages(pages))
    }

    /// Gets the git tree of a commit, the head of the branch by default.
    ///
    /// A tree that does not exist is returned as [`Tree::default()`].
    #[instrument(skip(self, walker), fields(branch = %self.name()))]
    pub async fn get_tree(
        &self,
        walker: &RepoWalker,
        options: &TreeOptions,
    ) -> Result<Tree, Error> {
        let sha = self.sha_or_head(options.sha.as_deref());
        let api = walker.api();

        let result = retry_on_connection_issues(move || {
            api.get_tree(self.owner(), self.repo.name(), sha, options.recursive)
        })
        .await;

        match result {
            Ok(page) => deserialize_item("tree", page.data),
            Err(e) if e.is_not_found() => {
                debug!(sha, "Tree not found");
                Ok(Tree::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Accessor for branches.
pub struct Branches<'a> {
    api: &'a dyn GitHubApi,
}

impl<'a> Branches<'a> {
    pub(crate) fn new(api: &'a dyn GitHubApi) -> Self {
        Self { api }
    }

    /// Gets a single branch of `repo`.
    ///
    /// Returns `Ok(None)` if the branch does not exist. A connection reset is
    /// retried once.
    ///
    /// # Errors
    ///
    /// Any other failure is returned as `Error::Context`.
    #[instrument(skip(self, user, repo), fields(repo = %repo.name()))]
    pub async fn get(
        &self,
        user: &Arc<User>,
        repo: &Arc<Repo>,
        name: &str,
    ) -> Result<Option<Branch>, Error> {
        let owner = user.login.as_str();
        let result =
            retry_on_connection_issues(move || self.api.get_branch(owner, repo.name(), name)).await;

        match result {
            Ok(page) => {
                let data: BranchData = deserialize_item("branch", page.data)?;
                Ok(Some(Branch::new(data, Arc::clone(user), Arc::clone(repo))))
            }
            Err(e) if e.is_not_found() => {
                info!("Branch {}/{}@{} not found", owner, repo.name(), name);
                Ok(None)
            }
            Err(source) => Err(Error::Context {
                operation: format!("get branch {}/{}@{}", owner, repo.name(), name),
                source,
            }),
        }
    }

    /// Lists the branches of `repo`.
    #[instrument(skip(self, user, repo), fields(repo = %repo.name()))]
    pub async fn get_all(
        &self,
        user: &Arc<User>,
        repo: &Arc<Repo>,
        options: &ListOptions,
    ) -> Result<Vec<Branch>, Error> {
        info!("Fetching all branches of {}/{}", user.login, repo.name());

        let params = PageParams {
            per_page: options.per_page,
        };
        let first = self
            .api
            .list_branches(&user.login, repo.name(), &params)
            .await?;
        let pages = get_all_pages(self.api, first, options.count).await?;

        let branches: Vec<BranchData> = deserialize_items("branch", flatten_pages(pages))?;
        Ok(branches
            .into_iter()
            .map(|data| Branch::new(data, Arc::clone(user), Arc::clone(repo)))
            .collect())
    }
}
