use crate::scrapers::traits::Selectors;
use crate::scrapers::types::DEFAULT_BASE_URL;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How to reconcile room-name and room-price lists of different lengths
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PairingPolicy {
    /// Pair up to the shorter list and warn about the dropped entries
    #[default]
    Truncate,
    /// Drop the whole hotel when the counts differ
    Strict,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Chrome launch settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub sandbox: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    /// Chrome binary; auto-detected when unset
    pub chrome_path: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            window_width: 1920,
            window_height: 1080,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36".to_string(),
            chrome_path: None,
            extra_args: Vec::new(),
        }
    }
}

/// Everything a scrape run needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoutConfig {
    pub destination: String,
    pub hotel_codes: Vec<String>,
    /// Length of stay; check-out is check-in plus this many days
    pub nights: u32,
    pub base_url: String,
    /// Upper bound for each element wait
    pub wait_timeout_secs: u64,
    pub selectors: Selectors,
    pub pairing: PairingPolicy,
    pub output: PathBuf,
    pub output_format: OutputFormat,
    pub log_file: PathBuf,
    /// `EnvFilter` directive, e.g. `error` or `hotel_scout=debug`
    pub log_level: String,
    pub max_concurrent_sessions: usize,
    pub continue_on_session_error: bool,
    /// Where to dump HTML and screenshots of pages that failed to extract
    pub debug_dir: Option<PathBuf>,
    pub browser: BrowserConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            destination: "Auburn, Alabama, United States".to_string(),
            hotel_codes: ["AUOAU", "AUOAV", "AUOCS", "AUOOP", "PXCAL", "CSGGO", "AUOCW"]
                .into_iter()
                .map(String::from)
                .collect(),
            nights: 1,
            base_url: DEFAULT_BASE_URL.to_string(),
            wait_timeout_secs: 20,
            selectors: Selectors::default(),
            pairing: PairingPolicy::default(),
            output: PathBuf::from("hotel_room_data.csv"),
            output_format: OutputFormat::default(),
            log_file: PathBuf::from("hotel_scraper.log"),
            log_level: "error".to_string(),
            max_concurrent_sessions: 1,
            continue_on_session_error: false,
            debug_dir: None,
            browser: BrowserConfig::default(),
        }
    }
}

impl ScoutConfig {
    /// Load a TOML config file; absent keys take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.hotel_codes.is_empty(), "hotel_codes must not be empty");
        ensure!(self.nights > 0, "nights must be at least 1");
        ensure!(self.wait_timeout_secs > 0, "wait_timeout_secs must be at least 1");
        ensure!(
            self.max_concurrent_sessions > 0,
            "max_concurrent_sessions must be at least 1"
        );
        Ok(())
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}
