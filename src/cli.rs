//! CLI parsing and orchestration. Parses args, runs enumerate -> extract -> write JSON or CSV.
//! Maps errors to exit codes.

use crate::config::{self, Config, DEFAULT_LISTING_URL, DEFAULT_ORIGIN};
use crate::formats::{write_records, FormatError, OutputFormat};
use crate::scraper::{
    scrape_branches, ScrapeOptions, ScraperError, SiteClient, DEFAULT_CONCURRENCY,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scraper(#[from] ScraperError),

    #[error("{0}")]
    Format(#[from] FormatError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scraper(_) => 2,
            CliRunError::Format(_) => 3,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "oriencoop-scrape", version)]
#[command(about = "Scrape Oriencoop branch listings and write task1.json or task1.csv")]
#[command(
    after_help = "Config file keys (listing_url, origin, user_agent, timeout_secs, concurrency, output_dir) are read from ./oriencoop-scrape.toml or the user config directory. Set RUST_LOG=debug for per-page logging."
)]
pub struct Args {
    /// Choose processing type.
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

/// Effective run settings after applying config over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub listing_url: String,
    pub origin: String,
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub output_dir: PathBuf,
}

impl Settings {
    pub fn from_config(config: Option<&Config>) -> Self {
        let concurrency = config
            .and_then(|c| c.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            log::warn!("concurrency = 0 in config; using 1");
        }
        Self {
            listing_url: config
                .and_then(|c| c.listing_url.clone())
                .unwrap_or_else(|| DEFAULT_LISTING_URL.to_string()),
            origin: config
                .and_then(|c| c.origin.clone())
                .unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
            user_agent: config.and_then(|c| c.user_agent.clone()),
            timeout_secs: config
                .and_then(|c| c.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            concurrency: concurrency.max(1),
            output_dir: config
                .and_then(|c| c.output_dir.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub async fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let settings = Settings::from_config(config.as_ref());
    run_with(args, &settings).await?;
    Ok(())
}

/// Page progress bar on stderr. Hidden when debug logging is on, since per-page log lines
/// would otherwise be drawn over.
fn progress_bar() -> Result<ProgressBar, CliRunError> {
    if log::log_enabled!(log::Level::Debug) {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner} {msg} [{bar:40}] {pos}/{len} ({elapsed})")
            .map_err(|e| CliRunError::InvalidInput(format!("Invalid progress template: {}", e)))?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("█▉▊▋▌▍▎▏ "),
    );
    Ok(bar)
}

/// Progress callback for the extractor. The bar is cleared once the last page settles so the
/// summary log line that follows is not drawn over.
fn progress_callback(bar: &ProgressBar) -> impl Fn(usize, usize) + '_ {
    move |n: usize, total: usize| {
        if bar.length() != Some(total as u64) {
            bar.set_length(total as u64);
            bar.enable_steady_tick(Duration::from_millis(80));
        }
        bar.set_position(n as u64);
        bar.set_message(format!("Fetched page {}/{}", n, total));
        if n >= total {
            bar.finish_and_clear();
        }
    }
}

/// Run the scrape with explicit settings and write the output file. Returns the path written.
pub async fn run_with(args: &Args, settings: &Settings) -> Result<PathBuf, CliRunError> {
    let mut builder = SiteClient::builder().timeout_secs(settings.timeout_secs);
    if let Some(ref ua) = settings.user_agent {
        builder = builder.user_agent(ua.clone());
    }
    let client = builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))?;

    log::info!("Start parsing data from {}", settings.listing_url);

    let bar = progress_bar()?;
    let progress_cb = progress_callback(&bar);
    let options = ScrapeOptions {
        concurrency: settings.concurrency,
        progress: Some(&progress_cb),
    };

    let result = scrape_branches(&client, &settings.listing_url, &settings.origin, &options).await;
    bar.disable_steady_tick();
    bar.finish_and_clear();
    let records = result?;

    let output_path = settings.output_dir.join(args.output.file_name());
    write_records(&records, args.output, &output_path)?;
    log::info!(
        "Wrote {} record(s) to {}",
        records.len(),
        output_path.display()
    );
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_defaults_to_json() {
        let args = Args::try_parse_from(["oriencoop-scrape"]).unwrap();
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn output_short_and_long_flags() {
        let args = Args::try_parse_from(["oriencoop-scrape", "-o", "csv"]).unwrap();
        assert_eq!(args.output, OutputFormat::Csv);
        let args = Args::try_parse_from(["oriencoop-scrape", "--output", "json"]).unwrap();
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn output_rejects_other_choices() {
        assert!(Args::try_parse_from(["oriencoop-scrape", "-o", "xml"]).is_err());
        assert!(Args::try_parse_from(["oriencoop-scrape", "-o", "CSV"]).is_err());
    }

    #[test]
    fn help_lists_output_choices_and_default() {
        use clap::CommandFactory;
        let help = Args::command().render_help().to_string();
        assert!(help.contains("--output"));
        assert!(help.contains("possible values: json, csv"));
        assert!(help.contains("default: json"));
    }

    #[test]
    fn no_other_flags_are_accepted() {
        assert!(Args::try_parse_from(["oriencoop-scrape", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["oriencoop-scrape", "https://oriencoop.cl"]).is_err());
    }

    #[test]
    fn progress_bar_clears_after_last_page() {
        let bar = ProgressBar::hidden();
        let cb = progress_callback(&bar);
        cb(1, 3);
        assert_eq!(bar.length(), Some(3));
        assert_eq!(bar.position(), 1);
        assert!(!bar.is_finished());
        cb(2, 3);
        assert!(!bar.is_finished());
        cb(3, 3);
        assert!(bar.is_finished());
    }

    #[test]
    fn settings_defaults_without_config() {
        let s = Settings::from_config(None);
        assert_eq!(s.listing_url, DEFAULT_LISTING_URL);
        assert_eq!(s.origin, DEFAULT_ORIGIN);
        assert_eq!(s.user_agent, None);
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(s.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(s.output_dir, PathBuf::from("."));
    }

    #[test]
    fn settings_config_overrides_and_clamps_concurrency() {
        let config: Config = toml::from_str(
            r#"
            origin = "http://127.0.0.1:9000"
            concurrency = 0
            output_dir = "out"
        "#,
        )
        .unwrap();
        let s = Settings::from_config(Some(&config));
        assert_eq!(s.origin, "http://127.0.0.1:9000");
        assert_eq!(s.listing_url, DEFAULT_LISTING_URL);
        assert_eq!(s.concurrency, 1);
        assert_eq!(s.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn cli_run_error_exit_codes() {
        assert_eq!(CliRunError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(
            CliRunError::Scraper(ScraperError::HttpStatus {
                status: 500,
                url: "https://oriencoop.cl/sucursales.htm".into(),
            })
            .exit_code(),
            2
        );
        assert_eq!(
            CliRunError::Format(FormatError::Write(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full"
            )))
            .exit_code(),
            3
        );
    }
}
