use async_trait::async_trait;

use crate::{
    error::Result,
    types::{FileContent, Principal, RepoId, TreeEntry},
};

/// Read-only access to the file tree of one repository
///
/// Missing paths are reported as `ScrapeError::NotFound` so callers can treat
/// them as empty without aborting.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// List the direct children of a directory (empty string is the root)
    async fn list_directory(&self, path: &str) -> Result<Vec<TreeEntry>>;

    /// Fetch a single file with its encoded payload
    async fn fetch_file(&self, path: &str) -> Result<FileContent>;

    /// Fetch the repository's canonical README
    async fn fetch_readme(&self) -> Result<FileContent>;

    /// Human-readable identifier for this source (for logging/debugging)
    fn identifier(&self) -> String;
}

/// A hosting service that authenticates and hands out repository sources
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    type Source: ContentSource;

    /// Identify the principal behind the configured credential
    ///
    /// Returns `ScrapeError::Unauthorized` if the credential is rejected.
    async fn authenticate(&self) -> Result<Principal>;

    /// Resolve a repository by identifier
    ///
    /// Returns `ScrapeError::RepositoryNotFound` if it does not exist or is
    /// not accessible with the current credential.
    async fn open_repository(&self, id: &RepoId) -> Result<Self::Source>;
}
