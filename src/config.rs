use std::path::PathBuf;

use crate::{
    convert::{DEFAULT_WRAP_WIDTH, MIN_WRAP_WIDTH},
    error::{Result, ScrapeError},
    filter::MarkdownFilter,
    github::DEFAULT_API_BASE,
    output::OutputMode,
    types::RepoId,
};

/// Environment variable holding the API token
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Environment variable overriding the REST API root
pub const API_URL_VAR: &str = "GITHUB_API_URL";

pub const DEFAULT_OUTPUT_ROOT: &str = "output";
pub const DEFAULT_DOCS_PATH: &str = "docs";

/// Settings for one run, built once at startup and passed explicitly
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub token: String,
    pub api_base: String,
    pub output_root: PathBuf,
    pub mode: OutputMode,
    /// Repository directory walked for documents
    pub docs_path: String,
    /// Markdown extensions, without the leading dot
    pub extensions: Vec<String>,
    pub wrap_width: usize,
}

/// Values supplied on the command line, taking precedence over defaults
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub output_root: Option<PathBuf>,
    pub mode: Option<OutputMode>,
    pub docs_path: Option<String>,
    pub extensions: Vec<String>,
    pub wrap_width: Option<usize>,
}

impl ScrapeConfig {
    /// Load from the process environment, reading `.env` first if present
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, overrides: ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScrapeError::MissingToken {
                var: TOKEN_VAR.to_string(),
            })?;

        let api_base = lookup(API_URL_VAR)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
            return Err(ScrapeError::InvalidConfig {
                message: format!("{} must be an http(s) URL, got '{}'", API_URL_VAR, api_base),
            });
        }

        let wrap_width = overrides.wrap_width.unwrap_or(DEFAULT_WRAP_WIDTH);
        if wrap_width < MIN_WRAP_WIDTH {
            return Err(ScrapeError::InvalidConfig {
                message: format!("wrap width must be at least {}", MIN_WRAP_WIDTH),
            });
        }

        let mode = overrides.mode.unwrap_or_default();
        let extensions = if overrides.extensions.is_empty() {
            mode.default_extensions().iter().map(|e| e.to_string()).collect()
        } else {
            overrides.extensions
        };

        Ok(Self {
            token,
            api_base,
            output_root: overrides
                .output_root
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT)),
            mode,
            docs_path: overrides
                .docs_path
                .unwrap_or_else(|| DEFAULT_DOCS_PATH.to_string())
                .trim_matches('/')
                .to_string(),
            extensions,
            wrap_width,
        })
    }

    pub fn filter(&self) -> MarkdownFilter {
        MarkdownFilter::new(&self.extensions)
    }

    /// `<output_root>/<owner>/<name>`
    pub fn repo_output_dir(&self, id: &RepoId) -> PathBuf {
        self.output_root.join(&id.owner).join(&id.name)
    }
}
