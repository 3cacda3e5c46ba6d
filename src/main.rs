mod cli;
mod config;
mod export;
mod models;
mod scrapers;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::ScoutConfig;
use models::{RoomRecord, StayDates};
use scrapers::{extract_rooms, HtmlSnapshot, IhgScraper, SearchRequest};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let (config, config_error) = load_config(&cli);

    if let Err(e) = init_logging(&config) {
        eprintln!("hotel-scout: {e:#}");
    }

    // Failures end up in the log, never in the exit status
    if let Some(e) = config_error {
        error!("Invalid configuration, nothing scraped: {e:#}");
        return;
    }
    if let Err(e) = run(&cli, config).await {
        error!("Error in main execution loop: {e:#}");
    }
}

/// Resolved config, or the defaults plus the reason resolving failed
fn load_config(cli: &Cli) -> (ScoutConfig, Option<anyhow::Error>) {
    match cli.resolve_config() {
        Ok(config) => (config, None),
        Err(e) => (ScoutConfig::default(), Some(e)),
    }
}

/// Filter for `directive`, falling back to `error` when it does not parse
fn log_filter(directive: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("error"), Some(e)),
    }
}

fn init_logging(config: &ScoutConfig) -> Result<()> {
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file {}", config.log_file.display()))?;

    let (filter, filter_error) = log_filter(&config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    if let Some(e) = filter_error {
        error!("Invalid log_level {:?}, using \"error\": {e}", config.log_level);
    }
    Ok(())
}

async fn run(cli: &Cli, config: ScoutConfig) -> Result<()> {
    let run_date = cli
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    info!("Hotel Scout - {} hotel codes for {}", config.hotel_codes.len(), config.destination);

    let records = match &cli.replay {
        Some(path) => replay(&config, path, run_date)?,
        None => IhgScraper::new(config.clone()).run(run_date).await?,
    };

    if records.is_empty() {
        warn!("No data collected, {} not created", config.output.display());
        return Ok(());
    }

    export::write_records(&records, &config.output, config.output_format)?;
    Ok(())
}

/// Run the extractor over a saved page, tagging rows with the first hotel code
fn replay(
    config: &ScoutConfig,
    path: &Path,
    run_date: chrono::NaiveDate,
) -> Result<Vec<RoomRecord>> {
    info!("Replaying saved page {}", path.display());

    let page = HtmlSnapshot::from_file(path)?;
    let stay = StayDates::starting(run_date, config.nights)?;
    let code = config.hotel_codes.first().cloned().unwrap_or_default();
    let request = SearchRequest::new(config.destination.clone(), stay, code);

    Ok(extract_rooms(&page, &request, &config.selectors, config.pairing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::LogCapture;
    use std::path::PathBuf;

    const PAGE: &str = r#"
        <div class="title-wrapper"><span>Hotel</span><span>Candlewood Suites Auburn</span></div>
        <div class="roomName">Studio King</div><div class="cash">$99</div>
        <div class="roomName">Studio Queen</div><div class="cash">$104</div>
        <div class="roomName">One Bedroom</div>
    "#;

    fn cli(replay: PathBuf, output: PathBuf) -> Cli {
        Cli {
            config: None,
            date: chrono::NaiveDate::from_ymd_opt(2024, 7, 15),
            output: Some(output),
            hotels: vec!["AUOCW".to_string()],
            replay: Some(replay),
        }
    }

    #[tokio::test]
    async fn replay_exports_paired_rooms() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("AUOCW.html");
        let output = dir.path().join("rooms.csv");
        std::fs::write(&page, PAGE).unwrap();

        let cli = cli(page, output.clone());
        run(&cli, cli.resolve_config().unwrap()).await.unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            concat!(
                "\"Auburn, Alabama, United States\",Candlewood Suites Auburn,",
                "15/7/2024,16/7/2024,Studio King,$99"
            )
        );
    }

    #[tokio::test]
    async fn empty_page_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("empty.html");
        let output = dir.path().join("rooms.csv");
        std::fs::write(&page, "<html><body>Sold out</body></html>").unwrap();

        let logs = LogCapture::default();
        let _guard = logs.install();

        let cli = cli(page, output.clone());
        run(&cli, cli.resolve_config().unwrap()).await.unwrap();

        assert!(!output.exists());
        let output = logs.contents();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("No data collected"), "{output}");
    }

    #[test]
    fn bad_log_level_falls_back_to_error() {
        let (filter, err) = log_filter("hotel_scout=loudest");
        assert!(err.is_some());
        assert_eq!(filter.to_string(), "error");

        let (_, err) = log_filter("hotel_scout=debug");
        assert!(err.is_none());
    }

    #[test]
    fn unreadable_config_falls_back_to_defaults() {
        let cli = Cli::try_parse_from(["hotel-scout", "--config", "/nonexistent/scout.toml"])
            .unwrap();
        let (config, err) = load_config(&cli);
        assert!(err.is_some());
        assert_eq!(config, ScoutConfig::default());
    }
}
