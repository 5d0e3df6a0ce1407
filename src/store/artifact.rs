//! Artifact metadata types and file digests.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::StoreError;

/// A resolved reference to an artifact in the store.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactHandle {
    /// Artifact name, without the version suffix.
    pub name: String,
    /// Store-assigned version.
    pub version: String,
    /// Where to fetch the wrapped file from. May be relative to the
    /// store's API base.
    pub download_url: String,
    /// Name the file should be saved under locally.
    pub file_name: String,
}

/// A new artifact being assembled for publication.
///
/// Wraps exactly one file; the digest is computed when the file is
/// attached.
#[derive(Debug, Clone)]
pub struct ArtifactDraft {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
    file: Option<DraftFile>,
}

#[derive(Debug, Clone)]
pub(crate) struct DraftFile {
    pub path: PathBuf,
    pub digest: String,
    pub size_bytes: u64,
}

impl ArtifactDraft {
    /// Creates an empty draft with the given metadata.
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: description.into(),
            file: None,
        }
    }

    /// Attaches the file this artifact wraps, computing its SHA-256
    /// digest. A second call replaces the previous file.
    pub fn add_file(&mut self, path: &Path) -> Result<(), StoreError> {
        let data = std::fs::read(path)?;
        self.file = Some(DraftFile {
            path: path.to_path_buf(),
            digest: compute_digest(&data),
            size_bytes: data.len() as u64,
        });
        Ok(())
    }

    /// Whether a file has been attached yet.
    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    pub(crate) fn file(&self) -> Option<&DraftFile> {
        self.file.as_ref()
    }
}

/// Metadata returned by the store after a successful publish.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishedArtifact {
    pub name: String,
    pub version: String,
}

/// Computes the SHA-256 digest of data as a hex string.
pub(crate) fn compute_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
