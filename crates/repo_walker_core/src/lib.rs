//! Linked GitHub entities with accessor methods.
//!
//! `repo_walker_core` turns the raw pages returned by a [`GitHubApi`] into
//! [`User`], [`Repo`] and [`Branch`] values. Repos keep a reference to the user
//! that owns them and branches keep references to both their user and their
//! repo, so follow-up queries can be made straight from an entity:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use repo_walker_core::{ListOptions, RepoWalker, User};
//!
//! # async fn example(walker: RepoWalker) -> Result<(), repo_walker_core::Error> {
//! let user = Arc::new(User::with_login("octocat"));
//! for repo in user.get_repos(&walker, &ListOptions::default()).await? {
//!     if let Some(branch) = repo.get_branch(&walker, "main").await? {
//!         println!("{}/{} -> {}", repo.user().login, repo.name(), branch.commit_sha());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! List operations follow the `rel="next"` links of the responses until the
//! last page, or until more than [`ListOptions::count`] items were received.

use std::fmt;
use std::sync::Arc;

use github_api::GitHubApi;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod branch;
pub mod contents;
pub mod errors;
pub mod flatten;
pub mod pagination;
pub mod repo;
pub mod retry;
pub mod user;

pub use branch::{
    Branch, BranchData, Branches, CommitOptions, CommitRef, CommitsOptions, ContentOptions,
    TreeOptions,
};
pub use contents::{ContentEntry, Contents, EntryType, FileContent, GitObjectType, Tree, TreeEntry};
pub use errors::Error;
pub use flatten::{flatten, flatten_pages};
pub use pagination::get_all_pages;
pub use repo::{Repo, RepoData, Repos};
pub use retry::retry_on_connection_issues;
pub use user::{User, Users};

#[cfg(test)]
mod test_support;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Options shared by every list operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Stop following pages once more than this many items were received.
    ///
    /// The cutoff is checked after each page, so the result may hold more
    /// items than `count`. `None` and `Some(0)` fetch every page.
    pub count: Option<usize>,

    /// Page size requested from GitHub on the first request.
    pub per_page: Option<u8>,
}

impl ListOptions {
    pub fn with_count(count: usize) -> Self {
        Self {
            count: Some(count),
            per_page: None,
        }
    }
}

/// Entry point to the entity accessors.
///
/// A `RepoWalker` owns the [`GitHubApi`] used by every accessor and every
/// entity operation. Cloning is cheap and shares the client.
#[derive(Clone)]
pub struct RepoWalker {
    api: Arc<dyn GitHubApi>,
}

impl RepoWalker {
    pub fn new(api: Arc<dyn GitHubApi>) -> Self {
        Self { api }
    }

    /// The client requests are sent through.
    pub fn api(&self) -> &dyn GitHubApi {
        self.api.as_ref()
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self.api())
    }

    pub fn repos(&self) -> Repos<'_> {
        Repos::new(self.api())
    }

    pub fn branches(&self) -> Branches<'_> {
        Branches::new(self.api())
    }
}

impl fmt::Debug for RepoWalker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepoWalker").finish_non_exhaustive()
    }
}

/// Deserializes a single raw item.
pub(crate) fn deserialize_item<T: DeserializeOwned>(
    entity: &'static str,
    item: Value,
) -> Result<T, Error> {
    serde_json::from_value(item).map_err(|source| Error::Deserialization { entity, source })
}

/// Deserializes every raw item of a flattened list.
pub(crate) fn deserialize_items<T: DeserializeOwned>(
    entity: &'static str,
    items: Vec<Value>,
) -> Result<Vec<T>, Error> {
    items
        .into_iter()
        .map(|item| deserialize_item(entity, item))
        .collect()
}
