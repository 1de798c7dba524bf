//! Download → scrape → upload → clean sequence

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::api::{DatasetHost, DatasetRef};
use crate::workdir::clear_dir;

/// Version message attached to every upload
pub fn version_notes(now: DateTime<Utc>) -> String {
    format!(
        "Dataset updated till (UTC): {}",
        now.format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

/// Run one publish cycle against `host`.
///
/// `scrape` appends fresh rows to the files in `work_dir`. A new version is
/// created only when it returns `Ok(true)`; its errors propagate untouched
/// so callers can still tell a rate limit apart. Returns whether a version
/// was published.
pub fn publish<F>(
    host: &dyn DatasetHost,
    dataset: &DatasetRef,
    work_dir: &Path,
    reserved_file: &str,
    scrape: F,
) -> anyhow::Result<bool>
where
    F: FnOnce() -> anyhow::Result<bool>,
{
    std::fs::create_dir_all(work_dir)
        .with_context(|| format!("Cannot create {}", work_dir.display()))?;

    log::info!("Downloading {dataset} into {}", work_dir.display());
    host.download(dataset, work_dir)
        .with_context(|| format!("Failed to download {dataset}"))?;

    if !scrape()? {
        log::warn!("Scrape reported no success, {dataset} left unchanged");
        return Ok(false);
    }

    let notes = version_notes(Utc::now());
    log::info!("Uploading new version of {dataset}");
    host.create_version(dataset, work_dir, &notes)
        .with_context(|| format!("Failed to upload {dataset}"))?;

    clear_dir(work_dir, reserved_file)
        .with_context(|| format!("Cannot clean {}", work_dir.display()))?;
    Ok(true)
}
