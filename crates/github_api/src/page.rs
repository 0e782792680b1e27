//! Response page types.
//!
//! Every GitHub API call returns a [`ResponsePage`]: the JSON body plus the
//! metadata needed to fetch the following page of a paginated endpoint.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;

static NEXT_RELATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"rel="next""#).expect("valid next relation pattern"));

/// One response from the GitHub API.
///
/// # Examples
///
/// ```rust
/// use github_api::{ResponseMeta, ResponsePage};
/// use serde_json::json;
///
/// let page = ResponsePage {
///     data: json!([{ "login": "octocat" }]),
///     meta: ResponseMeta {
///         link: Some(r#"<https://api.github.com/users?since=1>; rel="next""#.to_string()),
///     },
/// };
///
/// assert_eq!(page.item_count(), 1);
/// assert!(page.has_next_page());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePage {
    /// The decoded JSON body.
    pub data: Value,
    /// Response metadata.
    pub meta: ResponseMeta,
}

/// Metadata carried next to a response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// The raw `Link` header, if the server sent one.
    pub link: Option<String>,
}

impl ResponsePage {
    /// Creates a page without link metadata.
    pub fn new(data: Value) -> Self {
        Self {
            data,
            meta: ResponseMeta::default(),
        }
    }

    /// Creates a page with the given `Link` header.
    pub fn with_link(data: Value, link: impl Into<String>) -> Self {
        Self {
            data,
            meta: ResponseMeta {
                link: Some(link.into()),
            },
        }
    }

    /// Number of items held by this page.
    ///
    /// Array bodies count their elements. Any other body counts as a single item.
    pub fn item_count(&self) -> usize {
        match &self.data {
            Value::Array(items) => items.len(),
            _ => 1,
        }
    }

    /// Returns `true` when the link metadata announces a next page.
    pub fn has_next_page(&self) -> bool {
        self.meta
            .link
            .as_deref()
            .is_some_and(|link| NEXT_RELATION.is_match(link))
    }

    /// The URL of the next page, if any.
    pub fn next_page_url(&self) -> Option<&str> {
        self.meta.link.as_deref().and_then(next_page_url)
    }
}

/// Extracts the `rel="next"` target from a `Link` header.
///
/// ```rust
/// use github_api::next_page_url;
///
/// let link = r#"<https://api.github.com/users?since=46>; rel="next", <https://api.github.com/users{?since}>; rel="first""#;
/// assert_eq!(next_page_url(link), Some("https://api.github.com/users?since=46"));
/// ```
pub fn next_page_url(link: &str) -> Option<&str> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| param.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target.strip_prefix('<')?.strip_suffix('>')
    })
}
