use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use flacquer_application::{EmbeddedTagSource, MatchPipeline, PipelineError};
use flacquer_catalog::CatalogClient;
use flacquer_config::{AppConfig, CatalogConfig};
use flacquer_domain::FileOutcome;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod progress;
mod prompt;
mod scan;

/// Resolve lossy local audio files to their lossless catalog counterparts.
#[derive(Debug, Parser)]
#[command(name = "flacquer", version)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured source directory.
    #[arg(long, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Override the configured destination directory.
    #[arg(long, value_name = "DIR")]
    destination_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = flacquer_config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.source_dir {
        config.library.source_dir = dir;
    }
    if let Some(dir) = cli.destination_dir {
        config.library.destination_dir = dir;
    }

    init_tracing(&config.telemetry.log_level);

    std::fs::create_dir_all(&config.library.destination_dir)?;

    let catalog = catalog_client(&config.catalog)?;
    let pipeline = MatchPipeline::new(
        catalog,
        config.clone(),
        Arc::new(EmbeddedTagSource),
        Arc::new(prompt::StdinConfirmation),
        Arc::new(progress::TerminalProgress::new()),
    );

    let files = scan::source_files(&config.library)?;
    if files.is_empty() {
        info!(
            target: "cli",
            dir = %config.library.source_dir.display(),
            extension = %config.library.source_extension,
            "no source files found"
        );
        return Ok(());
    }
    info!(target: "cli", count = files.len(), "starting batch run");

    let mut summary = RunSummary::default();
    for file in &files {
        match pipeline.run_file(file).await {
            Ok(outcome) => summary.record(&outcome),
            Err(PipelineError::Quit) => {
                info!(target: "cli", "batch run terminated by operator");
                break;
            }
            Err(e) => {
                error!(
                    target: "cli",
                    path = %file.display(),
                    error = %e,
                    "failed to process file"
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        target: "cli",
        acquired = summary.acquired,
        already_present = summary.already_present,
        no_match = summary.no_match,
        aborted = summary.aborted,
        failed = summary.failed,
        "batch run finished"
    );

    Ok(())
}

fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer().with_target(true).with_level(true);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn catalog_client(config: &CatalogConfig) -> Result<CatalogClient> {
    let client = CatalogClient::builder()
        .search_base_url(&config.search_base_url)
        .download_base_url(&config.download_base_url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .min_search_interval(Duration::from_millis(config.min_search_interval_ms))
        .build()?;
    Ok(client)
}

#[derive(Debug, Default)]
struct RunSummary {
    acquired: usize,
    already_present: usize,
    no_match: usize,
    aborted: usize,
    failed: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Acquired { .. } => self.acquired += 1,
            FileOutcome::AlreadyExists => self.already_present += 1,
            FileOutcome::NoMatch => self.no_match += 1,
            FileOutcome::Aborted => self.aborted += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(&FileOutcome::Acquired { bytes_written: 10 });
        summary.record(&FileOutcome::Acquired { bytes_written: 20 });
        summary.record(&FileOutcome::AlreadyExists);
        summary.record(&FileOutcome::NoMatch);
        summary.record(&FileOutcome::Aborted);

        assert_eq!(summary.acquired, 2);
        assert_eq!(summary.already_present, 1);
        assert_eq!(summary.no_match, 1);
        assert_eq!(summary.aborted, 1);
        assert_eq!(summary.failed, 0);
    }

    #[test]
    fn catalog_client_builds_from_config() {
        let config = CatalogConfig::default();
        assert!(catalog_client(&config).is_ok());
    }

    #[test]
    fn cli_parses_overrides() {
        let cli = Cli::parse_from([
            "flacquer",
            "--config",
            "flacquer.toml",
            "--source-dir",
            "/music/lossy",
            "--destination-dir",
            "/music/flac",
        ]);

        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("flacquer.toml")));
        assert_eq!(
            cli.source_dir.as_deref(),
            Some(std::path::Path::new("/music/lossy"))
        );
        assert_eq!(
            cli.destination_dir.as_deref(),
            Some(std::path::Path::new("/music/flac"))
        );
    }
}
