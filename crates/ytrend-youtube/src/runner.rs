//! Main runner: every configured region, one after another

use std::time::{Duration, Instant};

use ytrend_core::{ProgressContext, fmt_num};

use crate::api::PageSource;
use crate::config::Config;
use crate::error::ScrapeError;
use crate::paginate::fetch_region;
use crate::schema::header_line;
use crate::transform::{Row, trending_date};
use crate::writer::DatasetWriter;

/// Scrape execution summary
#[derive(Debug)]
pub struct Summary {
    pub regions: usize,
    pub rows: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// Fetch and write every region in list order.
///
/// Strictly sequential. The first error aborts the run; a rate limit comes
/// back as [`ScrapeError::RateLimited`] before anything is written for the
/// affected region.
pub fn run(
    config: &Config,
    source: &mut dyn PageSource,
    progress: &ProgressContext,
) -> Result<Summary, ScrapeError> {
    let start = Instant::now();
    let writer = DatasetWriter::new(&config.output_dir);
    let date = trending_date(chrono::Utc::now().date_naive());
    let header = header_line();

    log::info!(
        "Scraping {} regions into {}",
        config.regions.len(),
        config.output_dir.display()
    );

    let mut summary = Summary {
        regions: 0,
        rows: 0,
        skipped: 0,
        elapsed: Duration::ZERO,
    };

    for region in &config.regions {
        let pb = progress.region_line(region.as_str());

        let harvest = match fetch_region(source, region, &date) {
            Ok(harvest) => harvest,
            Err(e) => {
                pb.abandon_with_message("failed");
                return Err(ScrapeError::from_fetch(region, e));
            }
        };

        let mut lines = Vec::with_capacity(harvest.rows.len() + 1);
        lines.push(header.clone());
        lines.extend(harvest.rows.iter().map(Row::to_line));

        log::info!("> Writing {region} data to file...");
        pb.set_message("writing...");
        let written = writer
            .write_region(region, lines)
            .map_err(|source| ScrapeError::Io {
                path: writer.path_for(region),
                source,
            })?;
        pb.finish_with_message(format!(
            "{} rows ({} pages)",
            fmt_num(written),
            harvest.pages
        ));

        summary.regions += 1;
        summary.rows += written;
        summary.skipped += harvest.skipped;
    }

    summary.elapsed = start.elapsed();
    log::info!("Data written to CSV files.");
    log::info!(
        "Regions: {}, rows: {}, skipped: {}, time: {:.1}s",
        summary.regions,
        fmt_num(summary.rows),
        fmt_num(summary.skipped),
        summary.elapsed.as_secs_f64()
    );
    Ok(summary)
}
