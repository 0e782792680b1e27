use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the repo-walker CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    ///
    /// This error is returned when there are issues with the configuration file,
    /// such as invalid values or file access problems.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A GitHub request made through the walker failed.
    #[error(transparent)]
    Api(#[from] repo_walker_core::Error),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The requested branch does not exist.
    #[error("Branch {owner}/{repo}@{branch} not found")]
    BranchNotFound {
        owner: String,
        repo: String,
        branch: String,
    },

    /// Failed to write the result to standard output.
    #[error("Failed to write output: {0}")]
    Output(String),
}

impl Error {
    /// The process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BranchNotFound { .. } => 2,
            _ => 1,
        }
    }
}

impl From<github_api::Error> for Error {
    fn from(error: github_api::Error) -> Self {
        Error::Api(error.into())
    }
}
