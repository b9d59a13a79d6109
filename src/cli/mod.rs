//! Command-line parsing for the degree-day calculator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/compute code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::SiteConfig;

pub const DEFAULT_START: &str = "2023-04-01";
pub const DEFAULT_END: &str = "2024-07-09";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gdd", version, about = "Accumulated growing-degree-days from NASA POWER daily data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, compute, and print the table and chart.
    Report(ReportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `gdd report`, but renders
    /// results in a terminal UI using Ratatui.
    Tui(QueryArgs),
    /// Plot a previously exported result JSON.
    Plot(PlotArgs),
}

/// Date range and site overrides shared by every fetching command.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// First day (YYYY-MM-DD).
    #[arg(short = 's', long, value_parser = parse_date, default_value = DEFAULT_START)]
    pub start: NaiveDate,

    /// Last day, inclusive (YYYY-MM-DD).
    #[arg(short = 'e', long, value_parser = parse_date, default_value = DEFAULT_END)]
    pub end: NaiveDate,

    /// Latitude of the site (overrides GDD_LATITUDE).
    #[arg(long, allow_negative_numbers = true)]
    pub latitude: Option<f64>,

    /// Longitude of the site (overrides GDD_LONGITUDE).
    #[arg(long, allow_negative_numbers = true)]
    pub longitude: Option<f64>,

    /// Base temperature in °C (overrides GDD_BASE_TEMP).
    #[arg(long, allow_negative_numbers = true)]
    pub base_temp: Option<f64>,
}

impl QueryArgs {
    /// Apply flag overrides on top of an env-derived config.
    pub fn apply_to(&self, config: &mut SiteConfig) {
        if let Some(lat) = self.latitude {
            config.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            config.longitude = lon;
        }
        if let Some(base) = self.base_temp {
            config.base_temp_c = base;
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Print the parsed column list and first rows before the results.
    #[arg(long)]
    pub structure: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-day results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the run (site + per-day results) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting a saved result file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Result JSON file produced by `gdd report --export-json`.
    #[arg(long, value_name = "JSON")]
    pub input: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_to_original_window() {
        let cli = Cli::parse_from(["gdd", "report"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.query.start, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(args.query.end, NaiveDate::from_ymd_opt(2024, 7, 9).unwrap());
        assert!(!args.no_plot);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "gdd", "tui", "--start", "2024-01-01", "--latitude", "-10.5", "--base-temp", "10",
        ]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        let mut config = SiteConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.latitude, -10.5);
        assert_eq!(config.base_temp_c, 10.0);
        assert_eq!(config.longitude, crate::config::DEFAULT_LONGITUDE);
    }

    #[test]
    fn rejects_malformed_date() {
        assert!(Cli::try_parse_from(["gdd", "report", "--start", "01/04/2023"]).is_err());
    }
}
