//! Working directory housekeeping: snapshot unpacking and cleanup

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Dataset metadata Kaggle expects next to the data; survives every cleanup
pub const METADATA_FILE: &str = "dataset-metadata.json";

/// Extract a zip archive into `dir`, overwriting existing files.
///
/// Entries whose path would land outside `dir` abort the extraction.
/// Returns the number of files written.
pub fn unpack_zip(bytes: &[u8], dir: &Path) -> anyhow::Result<usize> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).context("Invalid zip archive")?;
    fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", dir.display()))?;

    let mut files = 0;
    for idx in 0..archive.len() {
        let mut entry = archive.by_index(idx).context("Corrupt zip entry")?;
        let Some(rel) = entry.enclosed_name() else {
            anyhow::bail!("Refusing unsafe archive path: {}", entry.name());
        };
        let out = dir.join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&out)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file =
            File::create(&out).with_context(|| format!("Cannot create {}", out.display()))?;
        io::copy(&mut entry, &mut file)
            .with_context(|| format!("Cannot extract {}", out.display()))?;
        files += 1;
    }
    Ok(files)
}

/// Remove everything in `dir` except the `reserved` file name.
///
/// A failure on one entry is logged and the rest are still processed.
/// Returns the number of entries removed.
pub fn clear_dir(dir: &Path, reserved: &str) -> io::Result<usize> {
    clear_dir_with(dir, reserved, |path, is_dir| {
        if is_dir {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        }
    })
}

fn clear_dir_with<F>(dir: &Path, reserved: &str, mut remove: F) -> io::Result<usize>
where
    F: FnMut(&Path, bool) -> io::Result<()>,
{
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::error!("Failed to read entry in {}. Reason: {e}", dir.display());
                continue;
            }
        };
        if entry.file_name() == reserved {
            continue;
        }
        let path = entry.path();
        let result = entry
            .file_type()
            .and_then(|ft| remove(&path, ft.is_dir()));
        match result {
            Ok(()) => removed += 1,
            Err(e) => log::error!("Failed to delete {}. Reason: {e}", path.display()),
        }
    }
    log::info!("Files removed: {removed}");
    Ok(removed)
}

/// Regular files directly under `dir` that belong in a dataset version
pub fn upload_candidates(dir: &Path, reserved: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name() == reserved {
            continue;
        }
        if entry.file_type()?.is_dir() {
            log::warn!("Skipping directory {}", entry.path().display());
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn unpack_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = zip_bytes(&[
            ("US_youtube_trending_data.csv", "h\nrow\n"),
            ("GB_youtube_trending_data.csv", "h\n"),
        ]);
        assert_eq!(unpack_zip(&bytes, dir.path()).unwrap(), 2);
        let us = fs::read_to_string(dir.path().join("US_youtube_trending_data.csv")).unwrap();
        assert_eq!(us, "h\nrow\n");
    }

    #[test]
    fn unpack_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.csv"), "stale content that is longer").unwrap();
        unpack_zip(&zip_bytes(&[("a.csv", "fresh")]), dir.path()).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.csv")).unwrap(), "fresh");
    }

    #[test]
    fn unpack_rejects_escaping_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("work");
        let bytes = zip_bytes(&[("../escape.csv", "x")]);

        let err = unpack_zip(&bytes, &dir).unwrap_err();
        assert!(err.to_string().contains("../escape.csv"));
        assert!(!root.path().join("escape.csv").exists());
    }

    #[test]
    fn unpack_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        assert!(unpack_zip(b"not a zip", dir.path()).is_err());
    }

    #[test]
    fn clear_keeps_metadata() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{}").unwrap();
        fs::write(dir.path().join("US.csv"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/inner.csv"), "x").unwrap();

        assert_eq!(clear_dir(dir.path(), METADATA_FILE).unwrap(), 2);
        let left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(left, [METADATA_FILE]);
    }

    #[test]
    fn clear_continues_after_failed_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{}").unwrap();
        for name in ["a.csv", "locked.csv", "z.csv"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }

        let removed = clear_dir_with(dir.path(), METADATA_FILE, |path, _| {
            if path.ends_with("locked.csv") {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
            } else {
                fs::remove_file(path)
            }
        })
        .unwrap();

        assert_eq!(removed, 2);
        let mut left: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(left, [METADATA_FILE, "locked.csv"]);
    }

    #[test]
    fn clear_missing_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clear_dir(&dir.path().join("missing"), METADATA_FILE).is_err());
    }

    #[test]
    fn candidates_skip_reserved_and_dirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(METADATA_FILE), "{}").unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        fs::write(dir.path().join("a.csv"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let files = upload_candidates(dir.path(), METADATA_FILE).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.csv", "b.csv"]);
    }
}
