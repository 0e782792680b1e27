//! Command implementations for the repo-walker CLI.
//!
//! Every command goes through the `repo_walker_core` accessors and produces a
//! JSON value that `main` prints to standard output.
//!
//! # Examples
//!
//! ```bash
//! # The first 200 or so GitHub users
//! repo-walker users --count 200
//!
//! # Decoded README of a branch
//! repo-walker content octocat hello-world main README
//!
//! # Full recursive tree of the head of a branch
//! repo-walker tree octocat hello-world main --recursive
//! ```

use std::sync::Arc;

use clap::Subcommand;
use github_api::{create_token_client, OctocrabApi};
use repo_walker_core::{
    Branch, CommitOptions, CommitsOptions, ContentOptions, ListOptions, Repo, RepoData, RepoWalker,
    TreeOptions, User,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::errors::Error;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Queries that walk GitHub entities.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum WalkCommands {
    /// List GitHub users, starting from the first account
    Users {
        /// Stop once more than this many users were received
        #[arg(long)]
        count: Option<usize>,
    },

    /// List the repositories of a user
    Repos {
        login: String,

        #[arg(long)]
        count: Option<usize>,
    },

    /// List the branches of a repository
    Branches {
        owner: String,
        repo: String,

        #[arg(long)]
        count: Option<usize>,
    },

    /// Show a single branch
    Branch {
        owner: String,
        repo: String,
        name: String,
    },

    /// Read a file or directory through a branch
    Content {
        owner: String,
        repo: String,
        branch: String,
        path: String,

        /// Commit, branch or tag to read from
        #[arg(long = "ref")]
        reference: Option<String>,
    },

    /// Show a commit, the head of the branch by default
    Commit {
        owner: String,
        repo: String,
        branch: String,

        #[arg(long)]
        sha: Option<String>,
    },

    /// List commits, starting from the head of the branch by default
    Commits {
        owner: String,
        repo: String,
        branch: String,

        #[arg(long)]
        sha: Option<String>,

        #[arg(long)]
        count: Option<usize>,
    },

    /// Show the git tree of a commit, the head of the branch by default
    Tree {
        owner: String,
        repo: String,
        branch: String,

        #[arg(long)]
        sha: Option<String>,

        #[arg(long)]
        recursive: bool,
    },
}

/// Builds a walker from the `[github]` configuration.
///
/// The token is read from the configured environment variable. Requests are
/// anonymous when it is not set.
pub fn connect(config: &AppConfig) -> Result<RepoWalker, Error> {
    let api_url = config.github.api_url.as_str();
    let token = config.github.token();
    if token.is_none() {
        info!(
            "{} is not set, sending anonymous requests",
            config.github.token_env
        );
    }

    let client = create_token_client(api_url, token.as_deref())?;
    let api = OctocrabApi::new(client, api_url)?;
    Ok(RepoWalker::new(Arc::new(api)))
}

/// Runs `command` and returns its result as JSON.
#[instrument(skip(walker, config))]
pub async fn execute(
    command: &WalkCommands,
    walker: &RepoWalker,
    config: &AppConfig,
) -> Result<Value, Error> {
    match command {
        WalkCommands::Users { count } => {
            let options = list_options(*count, config)?;
            let users = walker.users().get_all(&options).await?;
            to_json(users.iter().map(Arc::as_ref).collect::<Vec<&User>>())
        }
        WalkCommands::Repos { login, count } => {
            let options = list_options(*count, config)?;
            let user = Arc::new(User::with_login(login.as_str()));
            let repos = user.get_repos(walker, &options).await?;
            to_json(repos.iter().map(|repo| repo.data()).collect::<Vec<_>>())
        }
        WalkCommands::Branches { owner, repo, count } => {
            let options = list_options(*count, config)?;
            let repo = repo_of(owner, repo);
            let branches = repo.get_branches(walker, &options).await?;
            to_json(branches.iter().map(Branch::data).collect::<Vec<_>>())
        }
        WalkCommands::Branch { owner, repo, name } => {
            let branch = find_branch(walker, owner, repo, name).await?;
            to_json(branch.data())
        }
        WalkCommands::Content {
            owner,
            repo,
            branch,
            path,
            reference,
        } => {
            let branch = find_branch(walker, owner, repo, branch).await?;
            let options = ContentOptions {
                path: path.clone(),
                reference: reference.clone(),
            };
            to_json(branch.get_content(walker, &options).await?)
        }
        WalkCommands::Commit {
            owner,
            repo,
            branch,
            sha,
        } => {
            let branch = find_branch(walker, owner, repo, branch).await?;
            let options = CommitOptions { sha: sha.clone() };
            Ok(branch.get_commit(walker, &options).await?)
        }
        WalkCommands::Commits {
            owner,
            repo,
            branch,
            sha,
            count,
        } => {
            let list = list_options(*count, config)?;
            let branch = find_branch(walker, owner, repo, branch).await?;
            let options = CommitsOptions {
                sha: sha.clone(),
                list,
                ..Default::default()
            };
            Ok(Value::Array(branch.get_commits(walker, &options).await?))
        }
        WalkCommands::Tree {
            owner,
            repo,
            branch,
            sha,
            recursive,
        } => {
            let branch = find_branch(walker, owner, repo, branch).await?;
            let options = TreeOptions {
                sha: sha.clone(),
                recursive: *recursive,
            };
            to_json(branch.get_tree(walker, &options).await?)
        }
    }
}

/// Combines a `--count` argument with the configured page size.
fn list_options(count: Option<usize>, config: &AppConfig) -> Result<ListOptions, Error> {
    if count == Some(0) {
        return Err(Error::InvalidArguments(
            "--count must be greater than zero".to_string(),
        ));
    }

    Ok(ListOptions {
        count,
        per_page: config.github.per_page,
    })
}

/// A repository known only by owner login and name.
fn repo_of(owner: &str, repo: &str) -> Arc<Repo> {
    let data = RepoData {
        name: repo.to_string(),
        ..Default::default()
    };
    Arc::new(Repo::new(data, Arc::new(User::with_login(owner))))
}

async fn find_branch(
    walker: &RepoWalker,
    owner: &str,
    repo: &str,
    name: &str,
) -> Result<Branch, Error> {
    repo_of(owner, repo)
        .get_branch(walker, name)
        .await?
        .ok_or_else(|| Error::BranchNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: name.to_string(),
        })
}

fn to_json<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::Output(e.to_string()))
}
