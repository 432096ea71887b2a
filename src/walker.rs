use std::future::Future;
use std::pin::Pin;

use tracing::{debug, error, info, warn};

use crate::{
    convert::Converter,
    error::Result,
    filter::MarkdownFilter,
    output::{Bucket, OutputMode, OutputWriter},
    report::{EntryOutcome, WalkReport},
    source::ContentSource,
    types::{DocumentRecord, EntryType, TreeEntry},
};

type WalkFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// Depth-first walk over a repository tree that converts Markdown files
///
/// In per-file mode each document is written as soon as it is converted. In
/// combined mode every directory frame owns a bucket that is flushed once,
/// after the whole subtree below it has been walked.
pub struct TreeWalker<'a, S: ContentSource + ?Sized> {
    source: &'a S,
    converter: &'a Converter,
    filter: &'a MarkdownFilter,
    writer: &'a OutputWriter,
    mode: OutputMode,
}

impl<'a, S: ContentSource + ?Sized> TreeWalker<'a, S> {
    pub fn new(
        source: &'a S,
        converter: &'a Converter,
        filter: &'a MarkdownFilter,
        writer: &'a OutputWriter,
        mode: OutputMode,
    ) -> Self {
        Self {
            source,
            converter,
            filter,
            writer,
            mode,
        }
    }

    /// Walk everything below `path`
    ///
    /// A missing start path is recorded and yields an empty report. Any other
    /// failure to list it is returned.
    pub async fn walk(&self, path: &str) -> Result<WalkReport> {
        let mut report = WalkReport::default();
        self.walk_dir(path, &mut report).await?;
        Ok(report)
    }

    /// List a directory, treating a missing path as empty
    pub async fn list_or_empty(&self, path: &str) -> Result<Option<Vec<TreeEntry>>> {
        match self.source.list_directory(path).await {
            Ok(entries) => {
                info!(path = %path, items = entries.len(), "retrieved directory contents");
                Ok(Some(entries))
            }
            Err(e) if e.is_not_found() => {
                warn!(path = %path, "unable to retrieve contents, path not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn walk_dir<'f>(&'f self, path: &'f str, report: &'f mut WalkReport) -> WalkFuture<'f> {
        Box::pin(async move {
            let entries = match self.list_or_empty(path).await? {
                Some(entries) => entries,
                None => {
                    report.missing_paths.push(path.to_string());
                    return Ok(());
                }
            };

            let mut bucket = Bucket::new(path.trim_matches('/'));

            for entry in &entries {
                let visited = self.visit(entry, &mut bucket, report).await;
                if let Err(e) = visited {
                    error!(path = %entry.path, error = %e, "failed to process entry");
                    report.record(EntryOutcome::Failed {
                        path: entry.path.clone(),
                        message: e.to_string(),
                    });
                }
            }

            match self.writer.flush(&bucket).await {
                Ok(Some(artifact)) => report.artifacts.push(artifact),
                Ok(None) => {}
                Err(e) => {
                    error!(bucket = %bucket.key(), error = %e, "failed to write combined documents");
                    report.record(EntryOutcome::Failed {
                        path: path.to_string(),
                        message: e.to_string(),
                    });
                }
            }

            Ok(())
        })
    }

    async fn visit(
        &self,
        entry: &TreeEntry,
        bucket: &mut Bucket,
        report: &mut WalkReport,
    ) -> Result<()> {
        match entry.entry_type {
            EntryType::Dir => {
                info!(path = %entry.path, "entering directory");
                self.walk_dir(&entry.path, report).await
            }
            EntryType::File if self.filter.matches(&entry.name) => {
                let outcome = self.process_document(entry, bucket).await?;
                report.record(outcome);
                Ok(())
            }
            _ => {
                debug!(path = %entry.path, "skipping non-markdown entry");
                report.record(EntryOutcome::Skipped {
                    path: entry.path.clone(),
                });
                Ok(())
            }
        }
    }

    async fn process_document(&self, entry: &TreeEntry, bucket: &mut Bucket) -> Result<EntryOutcome> {
        info!(path = %entry.path, "processing file");
        let file = self.source.fetch_file(&entry.path).await?;

        let (body, degraded) = match self.converter.try_convert(&file) {
            Ok(text) => (text, None),
            Err(e) => {
                warn!(path = %entry.path, error = %e, "failed to convert document");
                (String::new(), Some(e.to_string()))
            }
        };

        let outcome = match self.mode {
            OutputMode::PerFile => {
                let artifact = self.writer.write_one(&entry.name, &body, &entry.path).await?;
                EntryOutcome::Written {
                    path: entry.path.clone(),
                    artifact,
                }
            }
            OutputMode::Combined => {
                bucket.push(DocumentRecord {
                    display_name: entry.name.clone(),
                    body,
                });
                EntryOutcome::Buffered {
                    path: entry.path.clone(),
                    bucket: bucket.key().to_string(),
                }
            }
        };

        Ok(match degraded {
            Some(message) => EntryOutcome::Degraded {
                path: entry.path.clone(),
                message,
                artifact: match outcome {
                    EntryOutcome::Written { artifact, .. } => Some(artifact),
                    _ => None,
                },
            },
            None => outcome,
        })
    }
}
