//! Scrape subcommand - fetch every region and append to the CSV files

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ytrend_core::{ProgressContext, fmt_num};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// Region list file, one code per line
    #[arg(short, long)]
    pub regions: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Merge CLI overrides into the file config and validate it
pub fn scrape_config(
    regions: Option<PathBuf>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<ytrend_youtube::Config> {
    ytrend_youtube::Config::try_from(ytrend_youtube::config::ScrapeArgs {
        api_key: config.youtube.api_key.clone(),
        api_url: config.youtube.api_url.clone(),
        region_file: regions.unwrap_or_else(|| config.youtube.region_file.clone()),
        output_dir: output.unwrap_or_else(|| config.output.dir.clone()),
        max_results: config.youtube.max_results,
    })
}

/// Run the orchestrator once and print its summary
pub fn scrape(scrape_config: &ytrend_youtube::Config, progress: &ProgressContext) -> Result<()> {
    let mut client = scrape_config.client()?;
    let summary = ytrend_youtube::run(scrape_config, &mut client, progress)?;
    super::print_summary(
        "Scrape",
        &[
            ("Regions", summary.regions.to_string()),
            ("Rows written", fmt_num(summary.rows)),
            ("Skipped (no statistics)", fmt_num(summary.skipped)),
            ("Output", scrape_config.output_dir.display().to_string()),
            ("Time", format!("{:.1}s", summary.elapsed.as_secs_f64())),
        ],
    );
    Ok(())
}

pub fn run(args: ScrapeArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    let scrape_config = scrape_config(args.regions, args.output, config)?;
    scrape(&scrape_config, progress)
}
