//! Terminal interaction: banner, repository prompt, final status lines.

use anyhow::{Context, Result};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::{
    config::TOKEN_VAR,
    error::{ErrorCategory, ScrapeError},
    report::ScrapeReport,
    types::{Principal, RepoId},
};

const BANNER: &str = r"
   ___ _ _   ___              _____        _
  / __(_) |_|   \ ___  __ ___|_   _|____ _| |_
 | (_ | |  _| |) / _ \/ _|___| | |/ -_) \ /  _|
  \___|_|\__|___/\___/\__|     |_|\___/_\_\\__|
";

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
}

pub fn print_authenticated(principal: &Principal) {
    println!("{} {}", "Authenticated as:".green(), principal.login.bold());
}

/// Ask for a repository until the answer looks like `owner/repo`
pub fn prompt_repository() -> Result<RepoId> {
    let input: String = Input::new()
        .with_prompt("Enter the repository name in the format 'owner/repo'")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            match input.parse::<RepoId>() {
                Ok(_) => Ok(()),
                Err(_) => Err("Invalid format. Please use 'owner/repo' format."),
            }
        })
        .interact_text()
        .context("Failed to read repository name")?;

    Ok(input.parse()?)
}

pub fn print_success(report: &ScrapeReport) {
    let failures = report.walk.failures().count();
    println!(
        "\n{} {}",
        "✨ Scraping completed for".green().bold(),
        report.repository.green().bold()
    );
    println!(
        "   {} documents, {} files written to {}",
        report.walk.documents(),
        report.artifact_count(),
        report.output_dir.display()
    );
    if failures > 0 {
        println!("   {}", format!("{} entries failed", failures).yellow());
    }
}

pub fn print_failure(err: &anyhow::Error) {
    eprintln!("{}", failure_message(err).red());
}

/// Human-readable, categorized description of a fatal error
pub fn failure_message(err: &anyhow::Error) -> String {
    let Some(scrape_err) = err.downcast_ref::<ScrapeError>() else {
        return format!("An unexpected error occurred: {:#}", err);
    };

    match scrape_err {
        ScrapeError::Unauthorized { .. } => format!(
            "Error: Invalid GitHub API key. Please check your {} in the .env file.",
            TOKEN_VAR
        ),
        e => match e.category() {
            ErrorCategory::Startup | ErrorCategory::Target => format!("Error: {}", e),
            ErrorCategory::Remote | ErrorCategory::Path => format!("GitHub API Error: {}", e),
            ErrorCategory::Document | ErrorCategory::Unexpected => {
                format!("An unexpected error occurred: {}", e)
            }
        },
    }
}
