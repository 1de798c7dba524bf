//! Publish subcommand - refresh the hosted Kaggle dataset

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use ytrend_core::ProgressContext;
use ytrend_kaggle::{Credentials, DatasetRef, KaggleClient};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// Kaggle dataset as OWNER/SLUG
    #[arg(short, long)]
    pub dataset: Option<String>,

    /// Region list file, one code per line
    #[arg(short, long)]
    pub regions: Option<PathBuf>,

    /// Working directory (downloaded snapshot + fresh rows)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// CLI flag, then config file, then the id stored in the metadata file
fn resolve_dataset(flag: Option<String>, config: &Config, work_dir: &Path) -> Result<DatasetRef> {
    if let Some(dataset) = flag.or_else(|| config.kaggle.dataset.clone()) {
        return DatasetRef::parse(&dataset);
    }
    let metadata = work_dir.join(&config.kaggle.reserved_file);
    DatasetRef::from_metadata(&metadata)
        .context("No dataset given: use --dataset, [kaggle] dataset, or a metadata file")
}

pub fn run(args: PublishArgs, config: &Config, progress: &ProgressContext) -> Result<()> {
    // Validate scraper settings before touching the remote dataset
    let scrape_config = super::scrape::scrape_config(args.regions, args.output, config)?;
    let work_dir = scrape_config.output_dir.clone();
    let dataset = resolve_dataset(args.dataset, config, &work_dir)?;

    let credentials = Credentials::load()?;
    let client = KaggleClient::new(&config.kaggle.api_url, credentials, &config.kaggle.reserved_file);

    let published = ytrend_kaggle::publish(
        &client,
        &dataset,
        &work_dir,
        &config.kaggle.reserved_file,
        || {
            super::scrape::scrape(&scrape_config, progress)?;
            Ok(true)
        },
    )?;
    if published {
        log::info!("Published new version of {dataset}");
    }
    Ok(())
}
