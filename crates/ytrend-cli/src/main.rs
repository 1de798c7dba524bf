//! ytrend - YouTube trending videos dataset builder
//!
//! Scrapes the per-region trending charts into CSV files and publishes
//! them as new versions of a Kaggle dataset.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ytrend_youtube::ScrapeError;

mod cmd;
mod config;

use config::Config;

/// Exit code for "rate limited, come back later"
const EXIT_RATE_LIMITED: u8 = 2;

#[derive(Parser)]
#[command(name = "ytrend")]
#[command(about = "YouTube trending videos dataset builder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors (for cron)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./ytrend.toml or ~/.config/ytrend/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch trending videos for every region into CSV files
    Scrape(cmd::scrape::ScrapeArgs),
    /// Download the Kaggle dataset, scrape into it and upload a new version
    Publish(cmd::publish::PublishArgs),
    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let rate_limited = e
                .downcast_ref::<ScrapeError>()
                .is_some_and(ScrapeError::is_rate_limited);
            log::error!("{e:#}");
            if rate_limited {
                ExitCode::from(EXIT_RATE_LIMITED)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let progress = ytrend_core::ProgressContext::new();

    // Logging:
    //   TTY:     info through MultiProgress so spinners stay intact
    //   non-TTY: plain lines for cron mail / CI logs
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    ytrend_core::init_logging(ytrend_core::Verbosity::from_flags(cli.quiet, cli.debug), multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    match cli.command {
        Command::Scrape(args) => cmd::scrape::run(args, &config, &progress),
        Command::Publish(args) => cmd::publish::run(args, &config, &progress),
        Command::Config => {
            use comfy_table::{
                Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
            };

            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .apply_modifier(UTF8_ROUND_CORNERS)
                .set_header(vec![
                    Cell::new("Setting").fg(Color::Cyan),
                    Cell::new("Value").fg(Color::Cyan),
                ]);

            table.add_row(vec![
                "Output directory",
                &config.output.dir.display().to_string(),
            ]);
            table.add_row(vec!["YouTube API URL", &config.youtube.api_url]);
            table.add_row(vec![
                "YouTube API key",
                if config.youtube.api_key.is_some() {
                    "configured"
                } else {
                    "not set"
                },
            ]);
            table.add_row(vec![
                "Region file",
                &config.youtube.region_file.display().to_string(),
            ]);
            table.add_row(vec!["Page size", &config.youtube.max_results.to_string()]);
            table.add_row(vec!["Kaggle API URL", &config.kaggle.api_url]);
            table.add_row(vec![
                "Kaggle dataset",
                config.kaggle.dataset.as_deref().unwrap_or("(from metadata file)"),
            ]);
            table.add_row(vec![
                "Kaggle credentials",
                if ytrend_kaggle::Credentials::load().is_ok() {
                    "configured"
                } else {
                    "not set"
                },
            ]);

            eprintln!("\n{table}");
            Ok(())
        }
    }
}
