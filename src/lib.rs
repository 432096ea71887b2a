pub mod cli;
pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod filter;
pub mod github;
pub mod logging;
pub mod output;
pub mod report;
pub mod scrape;
pub mod source;
pub mod types;
pub mod walker;

pub use config::{ConfigOverrides, ScrapeConfig};
pub use convert::Converter;
pub use error::{ErrorCategory, Result, ScrapeError};
pub use filter::MarkdownFilter;
pub use github::{GitHubClient, GitHubSource};
pub use output::{Bucket, OutputMode, OutputWriter};
pub use report::{EntryOutcome, ScrapeReport, WalkReport};
pub use scrape::Scraper;
pub use source::{ContentSource, RepositoryHost};
pub use types::{
    ContentEncoding, DocumentRecord, EntryType, FileContent, Principal, RepoId, RepositoryInfo,
    TreeEntry,
};
pub use walker::TreeWalker;
