//! Error types for entity accessors.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors returned by accessors and entity operations.
///
/// API failures pass through unchanged unless an operation adds the context
/// of what it was doing, in which case they are wrapped in [`Error::Context`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request to the GitHub API failed.
    #[error(transparent)]
    Api(#[from] github_api::Error),

    /// A request failed while performing `operation`.
    #[error("Failed to {operation}: {source}")]
    Context {
        operation: String,
        #[source]
        source: github_api::Error,
    },

    /// A file's `content` field was not valid base64.
    #[error("Failed to decode file content: {0}")]
    ContentDecode(String),

    /// A response item did not have the shape of the expected entity.
    #[error("Failed to deserialize {entity}: {source}")]
    Deserialization {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns `true` if the underlying API error was a not-found response.
    pub fn is_not_found(&self) -> bool {
        self.api_error().is_some_and(github_api::Error::is_not_found)
    }

    /// The API error behind this error, if any.
    pub fn api_error(&self) -> Option<&github_api::Error> {
        match self {
            Error::Api(e) | Error::Context { source: e, .. } => Some(e),
            _ => None,
        }
    }
}
