//! Repository contents and git tree types.
//!
//! This module contains the values returned by [`Branch::get_content`] and
//! [`Branch::get_tree`].
//!
//! [`Branch::get_content`]: crate::Branch::get_content
//! [`Branch::get_tree`]: crate::Branch::get_tree

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{deserialize_item, deserialize_items, Error};

#[cfg(test)]
#[path = "contents_tests.rs"]
mod tests;

/// The result of reading a path from a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Contents {
    /// A single file, symlink or submodule. The content is already decoded.
    File(FileContent),

    /// The entries of a directory.
    Directory(Vec<ContentEntry>),
}

impl Contents {
    /// Builds contents from a raw response body, decoding the file content.
    ///
    /// # Errors
    ///
    /// Returns `Error::ContentDecode` if the file content is not valid base64.
    pub fn from_response(data: Value) -> Result<Self, Error> {
        match data {
            Value::Array(entries) => Ok(Contents::Directory(deserialize_items(
                "content entry",
                entries,
            )?)),
            other => {
                let mut file: FileContent = deserialize_item("file content", other)?;
                if let Some(encoded) = file.content.take() {
                    file.content = Some(decode_content(&encoded)?);
                }
                Ok(Contents::File(file))
            }
        }
    }

    /// The decoded text of a file, `None` for directories.
    pub fn text(&self) -> Option<&str> {
        match self {
            Contents::File(file) => file.content.as_deref(),
            Contents::Directory(_) => None,
        }
    }
}

/// A file read through the contents API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub sha: Option<String>,

    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, rename = "type")]
    pub entry_type: Option<EntryType>,

    /// Decoded text of the file.
    ///
    /// GitHub omits the content of very large files, in which case this is empty.
    #[serde(default)]
    pub content: Option<String>,

    /// Encoding the content was delivered in, usually `base64`.
    #[serde(default)]
    pub encoding: Option<String>,

    #[serde(default)]
    pub download_url: Option<String>,
}

/// A single entry in a directory listing.
///
/// # Examples
///
/// ```rust
/// use repo_walker_core::{ContentEntry, EntryType};
///
/// let entry = ContentEntry {
///     name: "src".to_string(),
///     path: "src".to_string(),
///     entry_type: EntryType::Dir,
///     sha: "abc123".to_string(),
///     size: 0,
///     download_url: None,
/// };
///
/// assert!(matches!(entry.entry_type, EntryType::Dir));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Entry name (e.g., "lib.rs")
    pub name: String,

    /// Full path within repository (e.g., "src/lib.rs")
    pub path: String,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    pub sha: String,

    /// Size in bytes (0 for directories)
    #[serde(default)]
    pub size: u64,

    /// Download URL for files (None for directories)
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Type of an entry returned by the contents API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,

    /// A type this crate does not know about yet.
    #[serde(other)]
    Unknown,
}

/// A git tree.
///
/// The default value is the empty tree returned when the tree does not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    pub sha: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub tree: Vec<TreeEntry>,

    /// Set when GitHub cut a recursive listing short.
    #[serde(default)]
    pub truncated: bool,
}

impl Tree {
    pub fn is_empty(&self) -> bool {
        self.sha.is_none() && self.tree.is_empty()
    }
}

/// One object of a git tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,

    /// File mode, e.g. `100644` or `040000`.
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default, rename = "type")]
    pub object_type: Option<GitObjectType>,

    pub sha: String,

    /// Size in bytes, blobs only.
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Kind of git object referenced by a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitObjectType {
    Blob,
    Tree,
    Commit,

    #[serde(other)]
    Unknown,
}

/// Decodes base64 file content into text.
///
/// Line breaks inside the encoded data are ignored. Bytes that are not valid
/// UTF-8 are replaced with U+FFFD.
pub fn decode_content(encoded: &str) -> Result<String, Error> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| Error::ContentDecode(e.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
