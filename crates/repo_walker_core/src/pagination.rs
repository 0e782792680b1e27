//! Aggregation of paginated responses.

use github_api::{GitHubApi, ResponsePage};
use tracing::debug;

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;

/// Follows `rel="next"` links starting from `first` and returns every page received.
///
/// Pages are requested one after the other. The loop stops when a page has no
/// next link, or when `count` is set and the number of items received so far
/// is strictly greater than `count`. Because the check happens after a whole
/// page has been appended, the pages may hold more than `count` items.
///
/// A `count` of zero is treated as no cutoff.
///
/// # Errors
///
/// Any error from [`GitHubApi::get_next_page`] is returned as is. Pages fetched
/// before the failure are dropped.
pub async fn get_all_pages(
    api: &dyn GitHubApi,
    first: ResponsePage,
    count: Option<usize>,
) -> Result<Vec<ResponsePage>, github_api::Error> {
    let count = count.filter(|c| *c > 0);
    let mut pages = vec![first];
    let mut total = 0;

    loop {
        let current = &pages[pages.len() - 1];
        total += current.item_count();

        if count.is_some_and(|count| total > count) {
            debug!(pages = pages.len(), total, "Reached item count cutoff");
            break;
        }
        if !current.has_next_page() {
            break;
        }

        debug!(pages = pages.len(), total, "Fetching next page");
        let next = api.get_next_page(current).await?;
        pages.push(next);
    }

    Ok(pages)
}
