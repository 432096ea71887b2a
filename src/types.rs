use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Represents a node in a repository's file tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Slash-separated path relative to the repository root
    pub path: String,
    /// Leaf name of the file or folder
    pub name: String,
    /// Type of entry
    pub entry_type: EntryType,
}

/// Type of tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    File,
    Dir,
    Symlink,
    Submodule,
}

/// Encoding declared by the remote for a file payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentEncoding {
    Base64,
    /// Payload is the raw document text; empty when the remote did not inline it
    None,
    Other(String),
}

impl ContentEncoding {
    pub fn from_declared(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "base64" => ContentEncoding::Base64,
            "" | "none" | "utf-8" | "utf8" => ContentEncoding::None,
            other => ContentEncoding::Other(other.to_string()),
        }
    }
}

/// A file's encoded payload and metadata
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path relative to the repository root
    pub path: String,
    pub name: String,
    /// The payload exactly as delivered by the remote
    pub content: bytes::Bytes,
    pub encoding: ContentEncoding,
}

/// One converted Markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub display_name: String,
    pub body: String,
}

/// The authenticated account
#[derive(Debug, Clone, Deserialize)]
pub struct Principal {
    pub login: String,
}

/// Repository metadata returned when a repository is resolved
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    pub full_name: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ScrapeError::InvalidRepository {
            input: trimmed.to_string(),
        };

        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        let (owner, name) = (owner.trim(), name.trim());
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }

        Ok(RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
