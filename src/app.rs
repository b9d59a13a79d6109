//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves site configuration
//! - fetches and computes degree-days
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, QueryArgs, ReportArgs};
use crate::config::SiteConfig;
use crate::data::{FetchCache, PowerClient};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gdd` binary.
pub fn run() -> Result<(), AppError> {
    // `gdd` and `gdd --start ...` behave like `gdd tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Tui(args) => handle_tui(args),
        Command::Plot(args) => handle_plot(args),
    }
}

/// Env-derived config with CLI overrides applied and re-validated.
pub fn site_config_from_args(args: &QueryArgs) -> Result<SiteConfig, AppError> {
    let mut config = SiteConfig::from_env()?;
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let config = site_config_from_args(&args.query)?;
    let client = PowerClient::new(config.clone())?;
    let mut cache = FetchCache::new();

    let run = pipeline::run_query(&client, &mut cache, &config, args.query.start, args.query.end)?;

    if args.structure {
        println!("{}", crate::report::format_structure(&run.table));
    }
    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_table(&crate::report::table_rows(&run.records)));

    if !args.no_plot {
        let series = crate::report::chart_series(&run.records);
        println!("{}", crate::plot::render_ascii_chart(&series, args.width, args.height));
    }

    if let Some(path) = &args.export {
        crate::io::write_results_csv(path, &run.records)?;
    }
    if let Some(path) = &args.export_json {
        crate::io::write_series_json(path, &crate::io::SeriesFile::from_run(&run, &config))?;
    }

    Ok(())
}

fn handle_tui(args: QueryArgs) -> Result<(), AppError> {
    let config = site_config_from_args(&args)?;
    crate::tui::run(config, args.start, args.end)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let saved = crate::io::read_series_json(&args.input)?;
    let series = crate::report::chart_series(&saved.records);
    println!("{}", crate::plot::render_ascii_chart(&series, args.width, args.height));
    Ok(())
}

/// Rewrite argv so `gdd` defaults to `gdd tui`.
///
/// Rules:
/// - `gdd`                      -> `gdd tui`
/// - `gdd --start X ...`        -> `gdd tui --start X ...`
/// - `gdd --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "report" | "tui" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
