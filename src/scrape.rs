use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::{
    config::ScrapeConfig,
    convert::Converter,
    error::Result,
    filter::MarkdownFilter,
    output::{Bucket, OutputMode, OutputWriter, README_KEY, README_TITLE},
    report::ScrapeReport,
    source::{ContentSource, RepositoryHost},
    types::{DocumentRecord, Principal, RepoId},
    walker::TreeWalker,
};

/// Scrapes repository documentation from a host into local text files
pub struct Scraper<H: RepositoryHost> {
    host: H,
    config: ScrapeConfig,
    converter: Converter,
    filter: MarkdownFilter,
}

impl<H: RepositoryHost> Scraper<H> {
    pub fn new(host: H, config: ScrapeConfig) -> Self {
        Self {
            converter: Converter::new(config.wrap_width),
            filter: config.filter(),
            host,
            config,
        }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Check the credential before anything else is attempted
    pub async fn authenticate(&self) -> Result<Principal> {
        let principal = self.host.authenticate().await?;
        info!(login = %principal.login, "authenticated");
        Ok(principal)
    }

    /// Scrape the README and the docs tree of one repository
    ///
    /// Nothing is written if the repository cannot be resolved.
    pub async fn scrape(&self, id: &RepoId) -> Result<ScrapeReport> {
        let source = self.host.open_repository(id).await?;
        info!(repository = %id, source = %source.identifier(), "accessed repository");

        let writer = OutputWriter::new(self.config.repo_output_dir(id));
        writer.prepare().await?;

        let readme = self.process_readme(&source, &writer).await;

        let docs_path = self.config.docs_path.as_str();
        info!(path = %docs_path, mode = ?self.config.mode, "starting scrape");
        let walker = TreeWalker::new(
            &source,
            &self.converter,
            &self.filter,
            &writer,
            self.config.mode,
        );
        let walk = walker.walk(docs_path).await?;

        if walk.outcomes.is_empty() {
            warn!(
                path = %docs_path,
                repository = %id,
                "folder not found or empty in the repository"
            );
        }
        for failure in walk.failures() {
            warn!(path = %failure.path(), "entry was not scraped");
        }

        Ok(ScrapeReport {
            repository: id.full_name(),
            output_dir: writer.root().to_path_buf(),
            readme,
            walk,
        })
    }

    /// Convert and write the README; any failure is logged and skipped
    async fn process_readme(&self, source: &H::Source, writer: &OutputWriter) -> Option<PathBuf> {
        let file = match source.fetch_readme().await {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                warn!("README not found in the repository root");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "unable to fetch README");
                return None;
            }
        };

        info!(path = %file.path, "processing README");
        let text = self.converter.convert(&file);

        let written = match self.config.mode {
            OutputMode::PerFile => writer.write_one(README_TITLE, &text, README_KEY).await.map(Some),
            OutputMode::Combined => {
                let mut bucket = Bucket::new(README_KEY);
                bucket.push(DocumentRecord {
                    display_name: README_TITLE.to_string(),
                    body: text,
                });
                writer.flush(&bucket).await
            }
        };

        match written {
            Ok(artifact) => artifact,
            Err(e) => {
                error!(path = %file.path, error = %e, "failed to write README");
                None
            }
        }
    }
}
