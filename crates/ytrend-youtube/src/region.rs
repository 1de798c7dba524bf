//! Region codes selecting which national trending chart to fetch

use std::path::Path;

use anyhow::Context;

/// Two-letter ISO 3166-1 alpha-2 region code, stored uppercase
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionCode(String);

impl RegionCode {
    /// Parse a code from user input; surrounding whitespace and case are ignored
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(Self(s.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Output file name for this region
    pub fn file_name(&self) -> String {
        format!("{}_youtube_trending_data.csv", self.0)
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse the contents of a region list: one code per line, `#` comments allowed
pub fn parse_region_codes(content: &str) -> anyhow::Result<Vec<RegionCode>> {
    let mut codes: Vec<RegionCode> = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let code = RegionCode::parse(line)
            .with_context(|| format!("line {}: invalid region code {line:?}", idx + 1))?;
        if codes.contains(&code) {
            log::debug!("{code}: duplicate region code ignored");
            continue;
        }
        codes.push(code);
    }
    Ok(codes)
}

/// Load region codes from the static list file
pub fn load_region_codes(path: &Path) -> anyhow::Result<Vec<RegionCode>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read region list {}", path.display()))?;
    let codes = parse_region_codes(&content)
        .with_context(|| format!("Invalid region list {}", path.display()))?;
    anyhow::ensure!(!codes.is_empty(), "No region codes in {}", path.display());
    log::debug!("{} regions loaded from {}", codes.len(), path.display());
    Ok(codes)
}
