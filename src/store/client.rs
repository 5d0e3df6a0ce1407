//! HTTP client for the artifact store REST API.
//!
//! One client instance serves the whole run: run registration, config
//! attachment, artifact resolution/download, publish and finish. All
//! requests carry bearer auth and share a single timeout; failures map
//! to [`StoreError`] and abort the run.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::info;

use super::artifact::{ArtifactDraft, ArtifactHandle, PublishedArtifact};
use super::run::RunContext;
use crate::error::StoreError;

/// Environment variable naming the store's API base URL.
pub const API_BASE_ENV: &str = "TRACKER_API_BASE";

/// Environment variable holding the store API key.
pub const API_KEY_ENV: &str = "TRACKER_API_KEY";

/// Client for the experiment-tracking artifact store.
pub struct StoreClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl StoreClient {
    /// Creates a client from `TRACKER_API_BASE` and `TRACKER_API_KEY`.
    pub fn from_env() -> Result<Self, StoreError> {
        let api_base = env::var(API_BASE_ENV).map_err(|_| StoreError::MissingApiBase)?;
        let api_key = env::var(API_KEY_ENV).map_err(|_| StoreError::MissingApiKey)?;
        Ok(Self::new(api_base, api_key))
    }

    /// Creates a client against an explicit endpoint.
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .expect("Failed to build HTTP client");
        let api_base: String = api_base.into();
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Registers a new run with the store and returns its context.
    pub async fn init_run(&self, job_type: &str) -> Result<RunContext, StoreError> {
        let url = format!("{}/runs", self.api_base);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "job_type": job_type }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: serde_json::Value = resp.json().await?;
        let run_id = body
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| StoreError::ApiError {
                status: status.as_u16(),
                message: "run response missing 'id'".to_string(),
            })?
            .to_string();

        let run = RunContext::new(run_id);
        info!(run_id = %run.id(), correlation_id = %run.correlation_id(), job_type, "Registered run");
        Ok(run)
    }

    /// Attaches the resolved configuration to a run for provenance.
    pub async fn log_run_config<T: Serialize>(
        &self,
        run: &RunContext,
        config: &T,
    ) -> Result<(), StoreError> {
        let url = format!("{}/runs/{}/config", self.api_base, run.id());
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(config)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Marks a run as finished. Called exactly once, after publish.
    pub async fn finish_run(&self, run: &RunContext) -> Result<(), StoreError> {
        let url = format!("{}/runs/{}/finish", self.api_base, run.id());
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }
        info!(run_id = %run.id(), "Run finished");
        Ok(())
    }

    /// Resolves an artifact name to its stored metadata.
    pub async fn resolve_artifact(&self, name: &str) -> Result<ArtifactHandle, StoreError> {
        let url = format!("{}/artifacts/{}", self.api_base, name);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(StoreError::ArtifactNotFound(name.to_string()));
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let handle: ArtifactHandle = resp.json().await?;
        Ok(handle)
    }

    /// Downloads the artifact's file into `dest_dir`, returning the
    /// local path. An existing file of the same name is overwritten.
    pub async fn download_file(
        &self,
        handle: &ArtifactHandle,
        dest_dir: &Path,
    ) -> Result<PathBuf, StoreError> {
        let url = if handle.download_url.starts_with("http") {
            handle.download_url.clone()
        } else {
            format!("{}{}", self.api_base, handle.download_url)
        };

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp.bytes().await?;
        let dest = dest_dir.join(&handle.file_name);
        std::fs::write(&dest, &bytes)?;

        info!(
            artifact = %handle.name,
            version = %handle.version,
            path = %dest.display(),
            bytes = bytes.len(),
            "Downloaded artifact file"
        );
        Ok(dest)
    }

    /// Publishes a draft artifact: metadata plus the wrapped file's
    /// bytes, base64-encoded in the commit body.
    pub async fn publish(
        &self,
        run: &RunContext,
        draft: &ArtifactDraft,
    ) -> Result<PublishedArtifact, StoreError> {
        let file = draft
            .file()
            .ok_or_else(|| StoreError::NoFile(draft.name.clone()))?;

        let content = std::fs::read(&file.path)?;
        let encoded = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, &content);
        let file_name = file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| draft.name.clone());

        let body = serde_json::json!({
            "name": draft.name,
            "type": draft.artifact_type,
            "description": draft.description,
            "digest": file.digest,
            "size_bytes": file.size_bytes,
            "run_id": run.id(),
            "file": {
                "name": file_name,
                "content": encoded,
                "encoding": "base64",
            },
        });

        let url = format!("{}/artifacts", self.api_base);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StoreError::PublishRejected {
                status: status.as_u16(),
                message,
            });
        }

        let published: PublishedArtifact = resp.json().await?;
        info!(
            artifact = %published.name,
            version = %published.version,
            size_bytes = file.size_bytes,
            "Published artifact"
        );
        Ok(published)
    }
}
