//! Scraper configuration

use std::path::PathBuf;

use anyhow::Context;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE, YouTubeClient};
use crate::region::{RegionCode, load_region_codes};

/// Environment variable holding the YouTube Data API key
pub const API_KEY_ENV: &str = "YT_API_KEY";

/// CLI-facing arguments for the scrape command (plain struct, no clap derive).
#[derive(Debug)]
pub struct ScrapeArgs {
    /// Explicit key; falls back to `YT_API_KEY`
    pub api_key: Option<String>,
    pub api_url: String,
    pub region_file: PathBuf,
    pub output_dir: PathBuf,
    pub max_results: u32,
}

impl Default for ScrapeArgs {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_BASE_URL.to_string(),
            region_file: PathBuf::from("country_codes.txt"),
            output_dir: PathBuf::from("datasets"),
            max_results: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Runtime configuration, built once at startup and passed down explicitly
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub regions: Vec<RegionCode>,
    pub output_dir: PathBuf,
    pub max_results: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("regions", &self.regions)
            .field("output_dir", &self.output_dir)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl TryFrom<ScrapeArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: ScrapeArgs) -> Result<Self, Self::Error> {
        let api_key = match args.api_key.filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => std::env::var(API_KEY_ENV)
                .ok()
                .filter(|k| !k.is_empty())
                .with_context(|| format!("{API_KEY_ENV} environment variable required"))?,
        };
        anyhow::ensure!(
            (1..=DEFAULT_PAGE_SIZE).contains(&args.max_results),
            "max_results must be between 1 and {DEFAULT_PAGE_SIZE}, got {}",
            args.max_results
        );
        let regions = load_region_codes(&args.region_file)?;

        Ok(Self {
            api_key,
            api_url: args.api_url,
            regions,
            output_dir: args.output_dir,
            max_results: args.max_results,
        })
    }
}

impl Config {
    /// HTTP page source for this configuration
    pub fn client(&self) -> anyhow::Result<YouTubeClient> {
        Ok(YouTubeClient::new(&self.api_url, self.api_key.clone())?.with_page_size(self.max_results))
    }
}
