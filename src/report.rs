use std::path::PathBuf;

/// What happened to a single tree entry during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Converted and written to its own artifact
    Written { path: String, artifact: PathBuf },
    /// Converted and held in its directory's bucket
    Buffered { path: String, bucket: String },
    /// Conversion failed; the document contributed empty text
    Degraded {
        path: String,
        message: String,
        artifact: Option<PathBuf>,
    },
    /// Not a Markdown file, or not a file at all
    Skipped { path: String },
    /// Processing failed; the walk moved on to the next sibling
    Failed { path: String, message: String },
}

impl EntryOutcome {
    pub fn path(&self) -> &str {
        match self {
            EntryOutcome::Written { path, .. }
            | EntryOutcome::Buffered { path, .. }
            | EntryOutcome::Degraded { path, .. }
            | EntryOutcome::Skipped { path }
            | EntryOutcome::Failed { path, .. } => path,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, EntryOutcome::Failed { .. })
    }
}

/// Outcomes and artifacts collected over one walk
#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub outcomes: Vec<EntryOutcome>,
    /// Every file written, in write order
    pub artifacts: Vec<PathBuf>,
    /// Paths that did not exist on the remote
    pub missing_paths: Vec<String>,
}

impl WalkReport {
    pub fn record(&mut self, outcome: EntryOutcome) {
        match &outcome {
            EntryOutcome::Written { artifact, .. }
            | EntryOutcome::Degraded {
                artifact: Some(artifact),
                ..
            } => self.artifacts.push(artifact.clone()),
            _ => {}
        }
        self.outcomes.push(outcome);
    }

    pub fn documents(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| {
                matches!(
                    o,
                    EntryOutcome::Written { .. }
                        | EntryOutcome::Buffered { .. }
                        | EntryOutcome::Degraded { .. }
                )
            })
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Result of scraping one repository
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    pub repository: String,
    pub output_dir: PathBuf,
    /// README artifact, if the repository has one
    pub readme: Option<PathBuf>,
    pub walk: WalkReport,
}

impl ScrapeReport {
    pub fn artifact_count(&self) -> usize {
        self.walk.artifacts.len() + usize::from(self.readme.is_some())
    }
}
