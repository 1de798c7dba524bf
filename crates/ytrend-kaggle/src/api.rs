//! Kaggle REST API client (dataset download and versioning)

use std::path::Path;
use std::time::UNIX_EPOCH;

use anyhow::Context;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use ytrend_core::http::execute;
use ytrend_core::{HttpResponse, http_client};

use crate::credentials::Credentials;
use crate::workdir::{unpack_zip, upload_candidates};

pub const DEFAULT_API_URL: &str = "https://www.kaggle.com/api/v1";

/// `owner/slug` reference to a hosted dataset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetRef {
    pub owner: String,
    pub slug: String,
}

impl DatasetRef {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let (owner, slug) = s
            .trim()
            .split_once('/')
            .with_context(|| format!("Dataset must be OWNER/SLUG, got {s:?}"))?;
        anyhow::ensure!(
            !owner.is_empty() && !slug.is_empty() && !slug.contains('/'),
            "Dataset must be OWNER/SLUG, got {s:?}"
        );
        Ok(Self {
            owner: owner.to_string(),
            slug: slug.to_string(),
        })
    }

    /// Read the `id` field of a `dataset-metadata.json` file
    pub fn from_metadata(path: &Path) -> anyhow::Result<Self> {
        #[derive(Deserialize)]
        struct Metadata {
            id: String,
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        let meta: Metadata = serde_json::from_str(&content)
            .with_context(|| format!("No dataset id in {}", path.display()))?;
        Self::parse(&meta.id)
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.slug)
    }
}

/// Remote dataset storage the publisher talks to
pub trait DatasetHost {
    /// Download the latest version and unpack it into `dir`
    fn download(&self, dataset: &DatasetRef, dir: &Path) -> anyhow::Result<()>;

    /// Upload the files in `dir` as a new version; older versions are kept
    fn create_version(&self, dataset: &DatasetRef, dir: &Path, notes: &str) -> anyhow::Result<()>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BlobUploadRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    content_length: u64,
    last_modified_epoch_seconds: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobUploadResponse {
    token: String,
    create_url: String,
}

#[derive(Serialize)]
struct UploadFile {
    token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVersionRequest<'a> {
    version_notes: &'a str,
    delete_old_versions: bool,
    convert_to_csv: bool,
    category_ids: Vec<String>,
    files: Vec<UploadFile>,
}

#[derive(Deserialize)]
struct CreateVersionResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Blocking Kaggle client authenticated with HTTP basic auth
#[derive(Debug, Clone)]
pub struct KaggleClient {
    api_url: String,
    credentials: Credentials,
    reserved_file: String,
}

impl KaggleClient {
    pub fn new(api_url: &str, credentials: Credentials, reserved_file: &str) -> Self {
        log::info!("Kaggle api credentials loaded for {}", credentials.username);
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
            reserved_file: reserved_file.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        http_client()
            .request(method, format!("{}/{path}", self.api_url))
            .basic_auth(&self.credentials.username, Some(&self.credentials.key))
    }

    fn post_json<T: Serialize>(&self, path: &str, body: &T) -> anyhow::Result<HttpResponse> {
        let body = serde_json::to_vec(body)?;
        let response = execute(
            self.request(Method::POST, path)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )?;
        Ok(response)
    }

    /// Register one file with the blob store and upload its bytes; returns the blob token
    fn upload_blob(&self, path: &Path) -> anyhow::Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Non UTF-8 file name: {}", path.display()))?;
        let meta = std::fs::metadata(path)
            .with_context(|| format!("Cannot stat {}", path.display()))?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs());

        let response = self.post_json(
            "blobs/upload",
            &BlobUploadRequest {
                kind: "dataset",
                name,
                content_length: meta.len(),
                last_modified_epoch_seconds: modified,
            },
        )?;
        ensure_success(&response, &format!("blob registration for {name}"))?;
        let blob: BlobUploadResponse = serde_json::from_slice(&response.body)
            .with_context(|| format!("Invalid blob upload response for {name}"))?;

        let bytes =
            std::fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
        let response = execute(http_client().put(&blob.create_url).body(bytes))?;
        ensure_success(&response, &format!("upload of {name}"))?;
        log::debug!("{name}: uploaded {} bytes", meta.len());
        Ok(blob.token)
    }
}

impl DatasetHost for KaggleClient {
    fn download(&self, dataset: &DatasetRef, dir: &Path) -> anyhow::Result<()> {
        let response = execute(self.request(
            Method::GET,
            &format!("datasets/download/{}/{}", dataset.owner, dataset.slug),
        ))?;
        ensure_success(&response, &format!("download of {dataset}"))?;
        let files = unpack_zip(&response.body, dir)?;
        log::info!("Dataset downloaded: {files} files into {}", dir.display());
        Ok(())
    }

    fn create_version(&self, dataset: &DatasetRef, dir: &Path, notes: &str) -> anyhow::Result<()> {
        let candidates = upload_candidates(dir, &self.reserved_file)
            .with_context(|| format!("Cannot list {}", dir.display()))?;
        anyhow::ensure!(!candidates.is_empty(), "No files to upload in {}", dir.display());

        let mut files = Vec::with_capacity(candidates.len());
        for path in &candidates {
            files.push(UploadFile {
                token: self.upload_blob(path)?,
            });
        }

        let response = self.post_json(
            &format!("datasets/create/version/{}/{}", dataset.owner, dataset.slug),
            &CreateVersionRequest {
                version_notes: notes,
                delete_old_versions: false,
                convert_to_csv: true,
                category_ids: Vec::new(),
                files,
            },
        )?;
        ensure_success(&response, &format!("new version of {dataset}"))?;
        let result: CreateVersionResponse = serde_json::from_slice(&response.body)
            .context("Invalid create version response")?;
        if let Some(err) = result.error.filter(|e| !e.is_empty()) {
            anyhow::bail!("Kaggle rejected new version of {dataset}: {err}");
        }
        log::info!(
            "Dataset uploaded: {} files{}",
            candidates.len(),
            result.url.map(|u| format!(" ({u})")).unwrap_or_default()
        );
        Ok(())
    }
}

/// Bail with status and a body excerpt on non-success responses
fn ensure_success(response: &HttpResponse, what: &str) -> anyhow::Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let mut body = response.text_lossy();
    if body.len() > 200 {
        let cut = (0..=200).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        body.truncate(cut);
    }
    anyhow::bail!("{what} failed: HTTP {}: {body}", response.status)
}
