//! Walks every page of one region's trending chart

use crate::api::PageSource;
use crate::error::FetchError;
use crate::region::RegionCode;
use crate::transform::{Row, normalize};

/// Rows collected for one region, in API order
#[derive(Debug, Default)]
pub struct RegionHarvest {
    pub rows: Vec<Row>,
    pub pages: usize,
    /// Items seen across all pages, including skipped ones
    pub items: usize,
    /// Items dropped for lack of statistics
    pub skipped: usize,
}

/// Fetch all pages for `region`, normalizing each item.
///
/// Stops after the first page without a `nextPageToken`. A token identical
/// to the one just sent would loop forever, so it also ends pagination.
pub fn fetch_region(
    source: &mut dyn PageSource,
    region: &RegionCode,
    trending_date: &str,
) -> Result<RegionHarvest, FetchError> {
    let mut harvest = RegionHarvest::default();
    let mut page_token: Option<String> = None;

    loop {
        let page = source.fetch_page(region, page_token.as_deref())?;
        harvest.pages += 1;
        harvest.items += page.items.len();

        for item in &page.items {
            match normalize(item, trending_date) {
                Some(row) => harvest.rows.push(row),
                None => {
                    harvest.skipped += 1;
                    log::debug!("{region}: skipping {} (no statistics)", item.id);
                }
            }
        }

        match page.next_page_token {
            Some(next) if page_token.as_deref() == Some(next.as_str()) => {
                log::warn!("{region}: API repeated page token {next}, stopping");
                break;
            }
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    log::debug!(
        "{region}: {} pages, {} rows, {} skipped",
        harvest.pages,
        harvest.rows.len(),
        harvest.skipped
    );
    Ok(harvest)
}
