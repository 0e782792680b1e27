//! Crate for reading from the GitHub REST API.
//!
//! This crate is the boundary between the entity accessors of `repo_walker_core`
//! and GitHub. It exposes the [`GitHubApi`] trait, whose operations all return a
//! raw [`ResponsePage`], and [`OctocrabApi`], the implementation backed by an
//! `Octocrab` client.

use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

pub mod errors;
pub use errors::Error;

pub mod page;
pub use page::{next_page_url, ResponseMeta, ResponsePage};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// The public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Query parameters for listing all users.
#[derive(Serialize, Default, Debug, Clone)]
pub struct ListUsersParams {
    /// Only users with an ID greater than this are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
}

/// Query parameters for listing the repositories of a user.
#[derive(Serialize, Default, Debug, Clone)]
pub struct ListReposParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,

    /// One of `created`, `updated`, `pushed` or `full_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Query parameters shared by list endpoints without filters.
#[derive(Serialize, Default, Debug, Clone)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
}

/// Query parameters for listing commits.
#[derive(Serialize, Default, Debug, Clone)]
pub struct ListCommitsParams {
    /// SHA or branch to start listing commits from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// Only commits touching this path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// GitHub login or email address of the commit author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// ISO 8601 timestamp, only commits after it are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,

    /// ISO 8601 timestamp, only commits before it are returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u8>,
}

/// Read operations against the GitHub REST API.
///
/// Every operation resolves to the raw [`ResponsePage`] of the request so that
/// callers can follow pagination with [`GitHubApi::get_next_page`].
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Lists all users, in the order they signed up.
    async fn list_users(&self, params: &ListUsersParams) -> Result<ResponsePage, Error>;

    /// Lists the public repositories of `username`.
    async fn list_repos_for_user(
        &self,
        username: &str,
        params: &ListReposParams,
    ) -> Result<ResponsePage, Error>;

    /// Gets a single branch.
    async fn get_branch(&self, owner: &str, repo: &str, branch: &str)
        -> Result<ResponsePage, Error>;

    /// Lists the branches of a repository.
    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        params: &PageParams,
    ) -> Result<ResponsePage, Error>;

    /// Gets a file or a directory listing.
    ///
    /// # Arguments
    ///
    /// * `path` - Path within the repository.
    /// * `reference` - Branch, tag or commit to read from. `None` reads the default branch.
    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<ResponsePage, Error>;

    /// Gets a single commit.
    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<ResponsePage, Error>;

    /// Lists commits of a repository.
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        params: &ListCommitsParams,
    ) -> Result<ResponsePage, Error>;

    /// Gets a git tree, optionally with all nested trees expanded.
    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        recursive: bool,
    ) -> Result<ResponsePage, Error>;

    /// Fetches the page following `previous`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNextPage`] if `previous` has no `rel="next"` link.
    async fn get_next_page(&self, previous: &ResponsePage) -> Result<ResponsePage, Error>;
}

/// A [`GitHubApi`] backed by an `Octocrab` client.
#[derive(Debug)]
pub struct OctocrabApi {
    client: Octocrab,
    base_url: Url,
}

impl OctocrabApi {
    /// Creates a new `OctocrabApi`.
    ///
    /// # Arguments
    ///
    /// * `client` - The client used to send requests.
    /// * `base_url` - The API root that request paths are resolved against.
    ///   It must be the same root the client was built with.
    ///
    /// # Errors
    /// Returns an `Error::InvalidUrl` if `base_url` is not an absolute URL.
    pub fn new(client: Octocrab, base_url: &str) -> Result<Self, Error> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    fn url<P: Serialize>(&self, path: &str, params: Option<&P>) -> Result<Url, Error> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;

        if let Some(params) = params {
            let pairs = query_pairs(params)?;
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        Ok(url)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, url: &str) -> Result<ResponsePage, Error> {
        debug!("Sending GET request");

        let response = match self.client._get(url).await {
            Ok(r) => r,
            Err(e) => {
                log_octocrab_error("Failed to send request", &e);
                return Err(Error::from(e));
            }
        };

        let response = match octocrab::map_github_error(response).await {
            Ok(r) => r,
            Err(e) => {
                let error = Error::from(e);
                if error.is_not_found() {
                    debug!("Resource not found");
                } else {
                    error!(error = %error, "GitHub rejected the request");
                }
                return Err(error);
            }
        };

        let link = response
            .headers()
            .get(http::header::LINK)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = self.client.body_to_string(response).await.map_err(|e| {
            log_octocrab_error("Failed to read response body", &e);
            Error::from(e)
        })?;

        let data = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };

        debug!(has_link = link.is_some(), "Received response");
        Ok(ResponsePage {
            data,
            meta: ResponseMeta { link },
        })
    }

    async fn get<P: Serialize + Sync>(
        &self,
        path: &str,
        params: Option<&P>,
    ) -> Result<ResponsePage, Error> {
        let url = self.url(path, params)?;
        self.fetch(url.as_str()).await
    }
}

#[async_trait]
impl GitHubApi for OctocrabApi {
    async fn list_users(&self, params: &ListUsersParams) -> Result<ResponsePage, Error> {
        self.get("/users", Some(params)).await
    }

    async fn list_repos_for_user(
        &self,
        username: &str,
        params: &ListReposParams,
    ) -> Result<ResponsePage, Error> {
        self.get(&format!("/users/{username}/repos"), Some(params))
            .await
    }

    async fn get_branch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<ResponsePage, Error> {
        self.get(
            &format!("/repos/{owner}/{repo}/branches/{branch}"),
            None::<&()>,
        )
        .await
    }

    async fn list_branches(
        &self,
        owner: &str,
        repo: &str,
        params: &PageParams,
    ) -> Result<ResponsePage, Error> {
        self.get(&format!("/repos/{owner}/{repo}/branches"), Some(params))
            .await
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<ResponsePage, Error> {
        #[derive(Serialize)]
        struct ContentQuery<'a> {
            #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
            reference: Option<&'a str>,
        }

        let path = path.trim_start_matches('/');
        self.get(
            &format!("/repos/{owner}/{repo}/contents/{path}"),
            Some(&ContentQuery { reference }),
        )
        .await
    }

    async fn get_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<ResponsePage, Error> {
        self.get(&format!("/repos/{owner}/{repo}/commits/{sha}"), None::<&()>)
            .await
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        params: &ListCommitsParams,
    ) -> Result<ResponsePage, Error> {
        self.get(&format!("/repos/{owner}/{repo}/commits"), Some(params))
            .await
    }

    async fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        recursive: bool,
    ) -> Result<ResponsePage, Error> {
        #[derive(Serialize)]
        struct TreeQuery {
            #[serde(skip_serializing_if = "Option::is_none")]
            recursive: Option<u8>,
        }

        let query = TreeQuery {
            recursive: recursive.then_some(1),
        };
        self.get(&format!("/repos/{owner}/{repo}/git/trees/{sha}"), Some(&query))
            .await
    }

    async fn get_next_page(&self, previous: &ResponsePage) -> Result<ResponsePage, Error> {
        let next = previous.next_page_url().ok_or(Error::NoNextPage)?;
        self.fetch(next).await
    }
}

/// Creates an `Octocrab` client for the API at `base_url`.
///
/// A `token` is sent as a personal access token. Without one the client makes
/// anonymous requests, which GitHub rate limits aggressively.
///
/// The client never retries on its own. Callers decide which requests are
/// retried, see `retry_on_connection_issues` in `repo_walker_core`.
///
/// # Example
///
/// ```rust,no_run
/// use github_api::{create_token_client, OctocrabApi, DEFAULT_API_URL};
///
/// # fn example() -> Result<(), github_api::Error> {
/// let client = create_token_client(DEFAULT_API_URL, Some("ghp_example"))?;
/// let api = OctocrabApi::new(client, DEFAULT_API_URL)?;
/// # Ok(())
/// # }
/// ```
#[instrument(skip(token))]
pub fn create_token_client(base_url: &str, token: Option<&str>) -> Result<Octocrab, Error> {
    let mut builder = Octocrab::builder()
        .add_retry_config(RetryConfig::None)
        .base_uri(base_url)
        .map_err(|e| Error::AuthError(format!("Invalid base URI {base_url}: {e}")))?;

    if let Some(token) = token {
        builder = builder.personal_token(token.to_string());
    }

    builder.build().map_err(|e| {
        error!(error = %e, "Failed to build Octocrab client");
        Error::AuthError(e.to_string())
    })
}

/// Converts a parameter struct into query pairs, skipping unset fields.
fn query_pairs<P: Serialize>(params: &P) -> Result<Vec<(String, String)>, Error> {
    let value = serde_json::to_value(params)?;
    let Value::Object(fields) = value else {
        return Ok(Vec::new());
    };

    Ok(fields
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

fn log_octocrab_error(message: &str, e: &octocrab::Error) {
    match e {
        octocrab::Error::GitHub { source, .. } => error!(
            error_message = source.message,
            status = source.status_code.as_u16(),
            "{}. Received an error from GitHub",
            message
        ),
        octocrab::Error::Uri { source, .. } => error!(
            error_message = source.to_string(),
            "{}. Failed to parse URI.",
            message
        ),
        octocrab::Error::InvalidUtf8 { source, .. } => error!(
            error_message = source.to_string(),
            "{}. The message wasn't valid UTF-8.",
            message,
        ),
        _ => error!(error_message = e.to_string(), "{}", message),
    };
}
