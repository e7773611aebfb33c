//! Gitopics CLI - topic extraction for GitHub repositories
//!
//! Fetches repository data, assembles the text corpus, runs the topic model,
//! and writes the results as CSV or JSON.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::info;

use gitopics_core::{init_logging, GitopicsConfig, LoggingConfig};
use gitopics_repo::{ApiClientConfig, RepositoryFetcher};
use gitopics_topics::load_model;

mod output;

use output::{write_results, OutputFormat};

#[derive(Parser)]
#[command(name = "gitopics")]
#[command(about = "Extract labeled topics from GitHub repositories")]
#[command(version)]
struct Cli {
    /// URL of the GitHub repository to extract topics from. With --file,
    /// a file containing one repository URL per line.
    input: String,

    /// GitHub token used to authenticate API requests
    #[arg(short, long)]
    token: String,

    /// Treat INPUT as a newline-delimited file of repository URLs
    #[arg(long)]
    file: bool,

    /// Path to the persisted topic-model state (overrides the config file)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Output format of the results
    #[arg(short = 'f', long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// File where the results will be saved; written to the console if absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut logging_config = LoggingConfig::default();
    if cli.verbose {
        logging_config.level = "debug".to_string();
    }
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting gitopics v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(cli.config.as_deref())?;
    let urls = read_input_urls(&cli.input, cli.file)?;

    info!("Loading repository data...");
    let api_config =
        ApiClientConfig::from_settings(&config.api, Some(cli.token.clone()));
    let fetcher = RepositoryFetcher::new(api_config)?;

    let mut records = Vec::with_capacity(urls.len());
    for url in &urls {
        // One repository at a time; a failed fetch aborts the run.
        records.push(fetcher.fetch(url).await?);
    }

    let corpus = gitopics_topics::assemble(&records);

    info!("Loading topic extraction model...");
    let model_path = cli
        .model
        .or_else(|| config.model.state_path.as_ref().map(PathBuf::from))
        .context("No topic model state configured; pass --model or set model.state_path")?;
    let model = load_model(&model_path)?;

    info!("Predicting topics...");
    let topics = model.transform(&corpus)?;

    info!("Writing results...");
    write_results(&records, &topics, cli.format, cli.output.as_deref())?;

    Ok(())
}

/// Load configuration from an explicit path or the default locations
fn load_config(config_path: Option<&Path>) -> anyhow::Result<GitopicsConfig> {
    if let Some(path) = config_path {
        info!("Loading configuration from {:?}", path);
        return Ok(GitopicsConfig::from_file(path)?);
    }

    let default_paths = [
        dirs::config_dir().map(|d| d.join("gitopics").join("config.toml")),
        dirs::home_dir().map(|d| d.join(".gitopics").join("config.toml")),
        Some(PathBuf::from("gitopics.toml")),
    ];

    for path in default_paths.into_iter().flatten() {
        if path.exists() {
            info!("Loading configuration from {:?}", path);
            return Ok(GitopicsConfig::from_file(path)?);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(GitopicsConfig::default())
}

/// The repository URLs to process: the input itself, or the non-empty lines
/// of the input file when --file is set
fn read_input_urls(input: &str, is_file: bool) -> anyhow::Result<Vec<String>> {
    if !is_file {
        return Ok(vec![input.to_string()]);
    }

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read URL file {}", input))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn single_url_input_passes_through() {
        let urls = read_input_urls("https://github.com/octocat/Hello-World", false).unwrap();
        assert_eq!(urls, vec!["https://github.com/octocat/Hello-World"]);
    }

    #[test]
    fn file_input_is_split_on_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "https://github.com/a/b").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  https://github.com/c/d  ").unwrap();

        let urls = read_input_urls(file.path().to_str().unwrap(), true).unwrap();
        assert_eq!(
            urls,
            vec!["https://github.com/a/b", "https://github.com/c/d"]
        );
    }

    #[test]
    fn missing_url_file_is_an_error() {
        assert!(read_input_urls("/nonexistent/urls.txt", true).is_err());
    }
}
