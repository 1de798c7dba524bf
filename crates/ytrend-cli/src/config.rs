//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for ytrend
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub youtube: YouTubeConfig,
    pub kaggle: KaggleConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Working directory holding one CSV per region
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("datasets"),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    pub region_file: PathBuf,
    pub max_results: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_url: ytrend_youtube::api::DEFAULT_BASE_URL.to_string(),
            api_key: std::env::var(ytrend_youtube::config::API_KEY_ENV).ok(),
            region_file: PathBuf::from("country_codes.txt"),
            max_results: ytrend_youtube::api::DEFAULT_PAGE_SIZE,
        }
    }
}

impl std::fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("region_file", &self.region_file)
            .field("max_results", &self.max_results)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KaggleConfig {
    pub api_url: String,
    /// `owner/slug`; falls back to the id in the metadata file
    pub dataset: Option<String>,
    pub reserved_file: String,
}

impl Default for KaggleConfig {
    fn default() -> Self {
        Self {
            api_url: ytrend_kaggle::api::DEFAULT_API_URL.to_string(),
            dataset: None,
            reserved_file: ytrend_kaggle::METADATA_FILE.to_string(),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./ytrend.toml (current directory)
    /// 2. ~/.config/ytrend/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("ytrend.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "ytrend") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.output.dir, PathBuf::from("datasets"));
        assert_eq!(config.youtube.region_file, PathBuf::from("country_codes.txt"));
        assert_eq!(config.youtube.max_results, 50);
        assert_eq!(config.kaggle.reserved_file, "dataset-metadata.json");
        assert!(config.kaggle.dataset.is_none());
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("YTREND_TEST_VAR", "test_value");
        assert_eq!(
            expand_env_var("${YTREND_TEST_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("YTREND_TEST_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[output]
dir = "/tmp/trending"

[youtube]
api_key = "literal-key"
region_file = "codes.txt"
max_results = 25

[kaggle]
dataset = "someone/youtube-trending"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.dir, PathBuf::from("/tmp/trending"));
        assert_eq!(config.youtube.api_key.as_deref(), Some("literal-key"));
        assert_eq!(config.youtube.region_file, PathBuf::from("codes.txt"));
        assert_eq!(config.youtube.max_results, 25);
        assert_eq!(
            config.kaggle.dataset.as_deref(),
            Some("someone/youtube-trending")
        );
        assert_eq!(config.kaggle.api_url, "https://www.kaggle.com/api/v1");
    }

    #[test]
    fn from_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ytrend.toml");
        std::fs::write(&path, "[output\n").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err}").contains("ytrend.toml"));
    }
}
