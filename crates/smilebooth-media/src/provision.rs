//! Startup provisioning of the Haar cascade definitions.
//!
//! Each definition is checked in the cascade directory and downloaded from
//! the upstream mirror when it is missing or empty. Download failures are
//! logged and reported, never fatal: the classifier loader turns a missing
//! file into an empty detector.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{error, info};

use smilebooth_models::ClassifierKind;

use crate::error::{MediaError, MediaResult};

/// Timeout for a single definition download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome for one definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Already on disk and non-empty
    Present,
    /// Fetched during this run
    Downloaded { bytes: u64 },
    /// Could not be fetched; the file is still missing or empty
    Failed { reason: String },
}

impl FileStatus {
    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Per-classifier provisioning results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub entries: Vec<(ClassifierKind, FileStatus)>,
}

impl ProvisionReport {
    /// Every definition is available locally.
    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|(_, status)| status.is_available())
    }

    pub fn status(&self, kind: ClassifierKind) -> Option<&FileStatus> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, status)| status)
    }
}

/// Ensures both cascade definitions exist in a local directory.
#[derive(Debug, Clone)]
pub struct CascadeProvisioner {
    dir: PathBuf,
    base_url: String,
    client: reqwest::Client,
}

impl CascadeProvisioner {
    /// Provisioner fetching from `base_url`, usually
    /// [`smilebooth_models::DEFAULT_CASCADE_BASE_URL`].
    pub fn with_base_url(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> MediaResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| MediaError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            dir: dir.into(),
            base_url: base_url.into(),
            client,
        })
    }

    /// Local path of a definition.
    pub fn path_for(&self, kind: ClassifierKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Make sure every definition is present, downloading what is missing.
    ///
    /// Each file is handled independently; one failed download does not
    /// prevent the other.
    pub async fn ensure_all(&self) -> ProvisionReport {
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            error!(dir = %self.dir.display(), "Failed to create cascade directory: {}", e);
        }

        let mut entries = Vec::with_capacity(ClassifierKind::ALL.len());
        for kind in ClassifierKind::ALL {
            let status = match self.ensure(kind).await {
                Ok(status) => status,
                Err(e) => {
                    error!(classifier = %kind, "Error downloading {}: {}", kind.file_name(), e);
                    FileStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            entries.push((kind, status));
        }
        ProvisionReport { entries }
    }

    async fn ensure(&self, kind: ClassifierKind) -> MediaResult<FileStatus> {
        let path = self.path_for(kind);
        if is_non_empty_file(&path).await {
            return Ok(FileStatus::Present);
        }

        let url = kind.url(&self.base_url);
        info!(classifier = %kind, url = %url, "Downloading {}", kind.file_name());
        let bytes = self.download(&url, &path).await?;
        info!(classifier = %kind, bytes, "Downloaded {} successfully", kind.file_name());
        Ok(FileStatus::Downloaded { bytes })
    }

    async fn download(&self, url: &str, dest: &Path) -> MediaResult<u64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MediaError::download_failed(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::download_failed(url, format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MediaError::download_failed(url, e.to_string()))?;
        if body.is_empty() {
            return Err(MediaError::download_failed(url, "empty response body"));
        }

        // Write beside the target first so a partial download never passes
        // the non-empty check on the next start.
        let temp_path = dest.with_extension("part");
        fs::write(&temp_path, &body).await?;
        if let Err(e) = fs::rename(&temp_path, dest).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(body.len() as u64)
    }
}

async fn is_non_empty_file(path: &Path) -> bool {
    match fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}
