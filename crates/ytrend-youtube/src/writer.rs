//! Per-region CSV output files (append-only)

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::region::RegionCode;

/// Appends rows to `{output_dir}/{region}_youtube_trending_data.csv`
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    output_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn path_for(&self, region: &RegionCode) -> PathBuf {
        self.output_dir.join(region.file_name())
    }

    /// Append `lines` to the region's file.
    ///
    /// The first element is always the header line. It is dropped from the
    /// appended rows and only written when the file is new or empty, so a
    /// file carries exactly one header for its whole lifetime.
    ///
    /// An existing file whose last line lacks a terminator gets one before
    /// the new rows, so rows never run together.
    ///
    /// Returns the number of data rows appended.
    pub fn write_region(&self, region: &RegionCode, lines: Vec<String>) -> io::Result<usize> {
        let mut lines = lines.into_iter();
        let header = lines.next();

        fs::create_dir_all(&self.output_dir)?;
        let path = self.path_for(region);
        let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);
        let needs_newline = !needs_header && !ends_with_newline(&path)?;

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut out = BufWriter::new(file);
        if needs_header {
            if let Some(header) = header {
                writeln!(out, "{header}")?;
            }
        } else if needs_newline {
            writeln!(out)?;
        }
        let mut written = 0;
        for line in lines {
            writeln!(out, "{line}")?;
            written += 1;
        }
        out.flush()?;

        log::debug!("{region}: {written} rows appended to {}", path.display());
        Ok(written)
    }
}

/// Whether the last byte of a non-empty file is `\n`
fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn us() -> RegionCode {
        RegionCode::parse("US").unwrap()
    }

    fn lines(rows: &[&str]) -> Vec<String> {
        std::iter::once("h1,h2".to_string())
            .chain(rows.iter().map(|r| r.to_string()))
            .collect()
    }

    #[test]
    fn creates_directory_and_file_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path().join("nested/out"));
        let n = writer
            .write_region(&us(), lines(&["\"a\",\"b\""]))
            .unwrap();
        assert_eq!(n, 1);
        let content = std::fs::read_to_string(writer.path_for(&us())).unwrap();
        assert_eq!(content, "h1,h2\n\"a\",\"b\"\n");
    }

    #[test]
    fn appends_without_second_header() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        writer.write_region(&us(), lines(&["r1"])).unwrap();
        writer.write_region(&us(), lines(&["r2", "r3"])).unwrap();
        let content = std::fs::read_to_string(writer.path_for(&us())).unwrap();
        assert_eq!(content, "h1,h2\nr1\nr2\nr3\n");
    }

    #[test]
    fn existing_file_without_header_only_gets_rows() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        std::fs::write(writer.path_for(&us()), "old\n").unwrap();
        writer.write_region(&us(), lines(&["new"])).unwrap();
        let content = std::fs::read_to_string(writer.path_for(&us())).unwrap();
        assert_eq!(content, "old\nnew\n");
    }

    #[test]
    fn unterminated_last_row_gets_newline_first() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        std::fs::write(writer.path_for(&us()), "h1,h2\n\"a\",\"b\"").unwrap();
        writer.write_region(&us(), lines(&["\"c\",\"d\""])).unwrap();
        let content = std::fs::read_to_string(writer.path_for(&us())).unwrap();
        assert_eq!(content, "h1,h2\n\"a\",\"b\"\n\"c\",\"d\"\n");
        assert!(content.lines().all(|l| l.split(',').count() == 2));
    }

    #[test]
    fn header_only_list_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = DatasetWriter::new(dir.path());
        assert_eq!(writer.write_region(&us(), lines(&[])).unwrap(), 0);
        let content = std::fs::read_to_string(writer.path_for(&us())).unwrap();
        assert_eq!(content, "h1,h2\n");
    }

    #[test]
    fn file_name_per_region() {
        let writer = DatasetWriter::new("datasets");
        let gb = RegionCode::parse("GB").unwrap();
        assert_eq!(
            writer.path_for(&gb),
            PathBuf::from("datasets/GB_youtube_trending_data.csv")
        );
    }
}
