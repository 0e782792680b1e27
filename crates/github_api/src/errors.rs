//! Error types for GitHub API operations.
//!
//! This module defines the errors surfaced by implementations of
//! [`GitHubApi`](crate::GitHubApi). Callers inspect them in two ways: the
//! not-found marker and the connection-reset class of transport failures.

use std::sync::LazyLock;

use regex::Regex;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

static CONNECTION_RESET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ECONNRESET|connection reset").expect("valid connection reset pattern")
});

/// Errors that can occur while talking to the GitHub API.
///
/// ## Examples
///
/// ```rust
/// use github_api::Error;
///
/// let error = Error::Connection("read ECONNRESET".to_string());
/// assert!(error.is_connection_reset());
/// assert!(!error.is_not_found());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// GitHub answered with a non-success status other than 404.
    ///
    /// The message is the `message` field of the GitHub error body.
    #[error("GitHub API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Building the client failed, usually because of an invalid token or base URI.
    #[error("Failed to initialize GitHub client: {0}")]
    AuthError(String),

    /// The response body could not be parsed as JSON.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The request never produced an HTTP response.
    ///
    /// The contained string is the full error chain of the underlying
    /// transport failure, e.g. `connection reset by peer`.
    #[error("Connection to GitHub failed: {0}")]
    Connection(String),

    /// A request URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    /// A next page was requested from a page whose link header has no `rel="next"` entry.
    #[error("The response has no next page")]
    NoNextPage,

    /// The requested resource does not exist (HTTP 404).
    #[error("Resource not found")]
    NotFound,
}

impl Error {
    /// Returns `true` for transient connection-reset failures.
    ///
    /// Only [`Error::Connection`] errors qualify; a GitHub error whose body
    /// happens to mention a reset is not a transport failure.
    pub fn is_connection_reset(&self) -> bool {
        match self {
            Error::Connection(message) => CONNECTION_RESET.is_match(message),
            _ => false,
        }
    }

    /// Returns `true` when the resource was reported missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

impl From<octocrab::Error> for Error {
    fn from(value: octocrab::Error) -> Self {
        match value {
            octocrab::Error::GitHub { source, .. } => {
                if source.status_code == http::StatusCode::NOT_FOUND {
                    Error::NotFound
                } else {
                    Error::Api {
                        status: source.status_code.as_u16(),
                        message: source.message,
                    }
                }
            }
            octocrab::Error::Serde { source, .. } => Error::Deserialization(source),
            other => Error::Connection(error_chain(&other)),
        }
    }
}

/// Joins an error and all of its sources into one message.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
