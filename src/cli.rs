use crate::config::ScoutConfig;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Scrape IHG room rates for a list of hotels into a CSV file.
///
/// Without arguments the built-in destination and hotel list are used.
#[derive(Debug, Parser)]
#[command(name = "hotel-scout", version)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Check-in date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Output file, overrides the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Hotel code to scrape; repeat to scrape several
    #[arg(long = "hotel")]
    pub hotels: Vec<String>,

    /// Extract from a saved page instead of launching a browser
    #[arg(long, value_name = "HTML")]
    pub replay: Option<PathBuf>,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> Result<ScoutConfig> {
        let mut config = match &self.config {
            Some(path) => ScoutConfig::load(path)?,
            None => ScoutConfig::default(),
        };
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if !self.hotels.is_empty() {
            config.hotel_codes = self.hotels.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_defaults() {
        let cli = Cli::try_parse_from(["hotel-scout"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap(), ScoutConfig::default());
        assert!(cli.date.is_none());
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let cli = Cli::try_parse_from([
            "hotel-scout",
            "--date",
            "2024-07-15",
            "--hotel",
            "PXCAL",
            "--hotel",
            "CSGGO",
            "-o",
            "out.csv",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2024, 7, 15));
        assert_eq!(config.hotel_codes, vec!["PXCAL", "CSGGO"]);
        assert_eq!(config.output, PathBuf::from("out.csv"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(Cli::try_parse_from(["hotel-scout", "--date", "15/07/2024"]).is_err());
    }
}
