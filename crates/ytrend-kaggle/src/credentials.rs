//! Kaggle API credentials

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

pub const USERNAME_ENV: &str = "KAGGLE_USERNAME";
pub const KEY_ENV: &str = "KAGGLE_KEY";
/// Overrides the directory holding `kaggle.json`
pub const CONFIG_DIR_ENV: &str = "KAGGLE_CONFIG_DIR";

/// Username + API key, used for HTTP basic auth
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    /// `KAGGLE_USERNAME` + `KAGGLE_KEY`, if both are set
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(USERNAME_ENV).ok().filter(|s| !s.is_empty())?;
        let key = std::env::var(KEY_ENV).ok().filter(|s| !s.is_empty())?;
        Some(Self { username, key })
    }

    /// Parse a `kaggle.json` file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let creds: Credentials = serde_json::from_str(&content)
            .with_context(|| format!("Invalid credentials file {}", path.display()))?;
        anyhow::ensure!(
            !creds.username.is_empty() && !creds.key.is_empty(),
            "Empty username or key in {}",
            path.display()
        );
        Ok(creds)
    }

    /// `$KAGGLE_CONFIG_DIR/kaggle.json`, else `~/.kaggle/kaggle.json`
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Some(PathBuf::from(dir).join("kaggle.json"));
        }
        directories::BaseDirs::new().map(|d| d.home_dir().join(".kaggle").join("kaggle.json"))
    }

    /// Environment first, then the credentials file
    pub fn load() -> anyhow::Result<Self> {
        if let Some(creds) = Self::from_env() {
            log::debug!("Kaggle credentials from environment");
            return Ok(creds);
        }
        let path = Self::default_path().context("Cannot locate home directory")?;
        let creds = Self::from_file(&path).with_context(|| {
            format!("Kaggle credentials not found: set {USERNAME_ENV}/{KEY_ENV} or create {}", path.display())
        })?;
        log::debug!("Kaggle credentials from {}", path.display());
        Ok(creds)
    }
}
