use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    config::{ConfigOverrides, ScrapeConfig},
    console,
    github::GitHubClient,
    output::OutputMode,
    report::ScrapeReport,
    scrape::Scraper,
    types::RepoId,
};

/// Convert a GitHub repository's Markdown docs into plain text files.
#[derive(Parser, Debug)]
#[command(name = "gitdoc-text", version, about)]
pub struct Cli {
    /// Repository in 'owner/repo' form; prompted for when omitted
    #[arg(short, long)]
    pub repo: Option<String>,

    /// One text file per document, or one per directory
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputMode>,

    /// Root directory for scraped repositories
    #[arg(short, long, value_name = "DIR", env = "GITDOC_OUTPUT_DIR")]
    pub output: Option<PathBuf>,

    /// Repository directory to walk for documents
    #[arg(long, value_name = "PATH")]
    pub docs_path: Option<String>,

    /// Markdown extension to accept (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Column at which converted text is wrapped
    #[arg(long, value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Skip the startup banner
    #[arg(long)]
    pub no_banner: bool,

    /// Log debug diagnostics, including skipped entries
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output_root: self.output.clone(),
            mode: self.mode,
            docs_path: self.docs_path.clone(),
            extensions: self.extensions.clone(),
            wrap_width: self.width,
        }
    }
}

/// Authenticate, pick a repository and scrape it
pub async fn run(cli: Cli) -> Result<ScrapeReport> {
    let config = ScrapeConfig::from_env(cli.overrides())?;
    let client = GitHubClient::new(config.token.clone(), config.api_base.clone());
    let scraper = Scraper::new(client, config);

    let principal = scraper.authenticate().await?;
    console::print_authenticated(&principal);

    let repo: RepoId = match cli.repo {
        Some(repo) => repo.parse()?,
        None => console::prompt_repository()?,
    };

    Ok(scraper.scrape(&repo).await?)
}
