//! Single retry of transient connection failures.

use std::future::Future;

use tracing::warn;

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;

/// Runs `operation`, running it a second time if the first attempt failed with
/// a connection reset.
///
/// The outcome of the second attempt is returned whatever it is. Errors that
/// are not connection resets are returned after the first attempt.
///
/// # Example
///
/// ```rust,no_run
/// use github_api::GitHubApi;
/// use repo_walker_core::retry_on_connection_issues;
///
/// # async fn example(api: &dyn GitHubApi) -> Result<(), github_api::Error> {
/// let page =
///     retry_on_connection_issues(|| api.get_branch("octocat", "hello-world", "main")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_on_connection_issues<T, F, Fut>(mut operation: F) -> Result<T, github_api::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, github_api::Error>>,
{
    match operation().await {
        Err(e) if e.is_connection_reset() => {
            warn!(error = %e, "Connection reset, retrying once");
            operation().await
        }
        result => result,
    }
}
