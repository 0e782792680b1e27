//! Flattening of nested result batches.

use github_api::ResponsePage;
use serde_json::Value;

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;

/// Removes one level of nesting from a sequence of values.
///
/// Arrays are spliced in place, every other value is kept as is. Relative order
/// is preserved.
///
/// ```rust
/// use repo_walker_core::flatten;
/// use serde_json::json;
///
/// let flat = flatten(vec![json!([1, 2]), json!(3), json!([4])]);
/// assert_eq!(flat, vec![json!(1), json!(2), json!(3), json!(4)]);
/// ```
pub fn flatten<I>(items: I) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    items.into_iter().fold(Vec::new(), |mut acc, item| {
        match item {
            Value::Array(nested) => acc.extend(nested),
            other => acc.push(other),
        }
        acc
    })
}

/// Takes the `data` of each page and flattens the result into one list.
pub fn flatten_pages(pages: Vec<ResponsePage>) -> Vec<Value> {
    flatten(pages.into_iter().map(|page| page.data))
}
