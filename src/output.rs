use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{error::Result, types::DocumentRecord};

/// Bucket key for documents directly under the repository root
pub const ROOT_KEY: &str = "";

/// Bucket key reserved for the repository README
pub const README_KEY: &str = "README";

/// Title line used for the README whatever its file name on the remote
pub const README_TITLE: &str = "README.md";

/// File stem used for the root bucket
pub const ROOT_ARTIFACT_STEM: &str = "root";

const FLATTEN_DELIMITER: &str = "_";
const SEPARATOR_CHAR: char = '=';
const SEPARATOR_WIDTH: usize = 80;
const TEXT_EXTENSION: &str = "txt";

/// How converted documents are turned into output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// One text file per source document, mirroring the repository tree
    #[default]
    PerFile,
    /// One text file per directory holding all of its documents
    Combined,
}

impl OutputMode {
    /// Markdown extensions accepted when none are configured
    pub fn default_extensions(self) -> &'static [&'static str] {
        match self {
            OutputMode::PerFile => &["md", "mdx"],
            OutputMode::Combined => &["md"],
        }
    }
}

/// Documents collected for one directory, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    key: String,
    records: Vec<DocumentRecord>,
}

impl Bucket {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: DocumentRecord) {
        self.records.push(record);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn records(&self) -> &[DocumentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Writes text artifacts under one repository's output directory
#[derive(Debug)]
pub struct OutputWriter {
    root: PathBuf,
    /// Combined artifacts written so far, to spot keys that flatten alike
    flushed: Mutex<HashSet<PathBuf>>,
    collisions: Mutex<Vec<PathBuf>>,
}

impl OutputWriter {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            flushed: Mutex::new(HashSet::new()),
            collisions: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the output root if it does not exist yet
    pub async fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write one converted document next to its mirrored source path
    ///
    /// Any existing file at the destination is replaced.
    pub async fn write_one(
        &self,
        display_name: &str,
        text: &str,
        source_path: &str,
    ) -> Result<PathBuf> {
        let path = self.per_file_path(source_path);
        write_file(&path, &render_single(display_name, text)).await?;

        info!(source = %source_path, artifact = %path.display(), "saved document");
        Ok(path)
    }

    /// Write every record of a bucket into a single artifact
    ///
    /// Returns `None` without touching storage when the bucket is empty.
    pub async fn flush(&self, bucket: &Bucket) -> Result<Option<PathBuf>> {
        if bucket.is_empty() {
            return Ok(None);
        }

        let path = self.bucket_path(bucket.key());
        if !self.flushed.lock().await.insert(path.clone()) {
            warn!(
                bucket = %bucket.key(),
                artifact = %path.display(),
                "combined artifact already written by another directory, overwriting"
            );
            self.collisions.lock().await.push(path.clone());
        }
        write_file(&path, &render_bucket(bucket)).await?;

        info!(
            bucket = %bucket.key(),
            documents = bucket.len(),
            artifact = %path.display(),
            "saved combined documents"
        );
        Ok(Some(path))
    }

    /// Combined artifacts that were written more than once in this run
    pub async fn collisions(&self) -> Vec<PathBuf> {
        self.collisions.lock().await.clone()
    }

    /// Destination of a per-file artifact: source path with a `.txt` extension
    pub fn per_file_path(&self, source_path: &str) -> PathBuf {
        let mut path = self.root.clone();
        for component in Path::new(source_path).components() {
            if let Component::Normal(part) = component {
                path.push(part);
            }
        }
        path.set_extension(TEXT_EXTENSION);
        path
    }

    /// Destination of a combined artifact for a bucket key
    pub fn bucket_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", flatten_key(key), TEXT_EXTENSION))
    }
}

/// Turn a directory key into a single-level file stem
pub fn flatten_key(key: &str) -> String {
    let trimmed = key.trim_matches('/');
    if trimmed.is_empty() {
        ROOT_ARTIFACT_STEM.to_string()
    } else {
        trimmed.replace('/', FLATTEN_DELIMITER)
    }
}

pub fn separator_line() -> String {
    std::iter::repeat(SEPARATOR_CHAR).take(SEPARATOR_WIDTH).collect()
}

pub fn render_single(display_name: &str, text: &str) -> String {
    format!("# {}\n\n{}", display_name, text)
}

pub fn render_bucket(bucket: &Bucket) -> String {
    let separator = separator_line();
    let mut out = String::new();
    for record in bucket.records() {
        out.push_str(&format!(
            "# {}\n\n{}\n\n{}\n\n",
            record.display_name, record.body, separator
        ));
    }
    out
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, contents).await?;
    Ok(())
}
