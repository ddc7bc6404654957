//! Prompt source backed by a directory of prompt versions
//!
//! Layout: `{root}/{slug}/{version}/version.json` plus
//! `{root}/{slug}/{version}/content.tmpl`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::payload::PromptPayload;
use crate::domain::prompt::{
    PromptOrigin, PromptReference, PromptResource, PromptSource, SemanticVersion, VersionSpec,
};
use crate::domain::DomainError;

const SOURCE_NAME: &str = "local";
const METADATA_FILE: &str = "version.json";
const CONTENT_FILE: &str = "content.tmpl";

#[derive(Debug, Clone)]
pub struct LocalPromptSource {
    root: PathBuf,
}

impl LocalPromptSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a prompt version into the directory, replacing any existing copy
    pub async fn save(&self, resource: &PromptResource) -> Result<PathBuf, DomainError> {
        let dir = self.root.join(resource.slug()).join(resource.version());

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| storage_error(&dir, e))?;

        let mut payload = PromptPayload::from(resource);
        let content = payload.content.take().unwrap_or_default();

        let metadata = serde_json::to_vec_pretty(&payload).map_err(|e| {
            DomainError::storage(format!("Failed to serialize {}: {}", resource.reference(), e))
        })?;

        let metadata_path = dir.join(METADATA_FILE);
        fs::write(&metadata_path, metadata)
            .await
            .map_err(|e| storage_error(&metadata_path, e))?;

        let content_path = dir.join(CONTENT_FILE);
        fs::write(&content_path, content)
            .await
            .map_err(|e| storage_error(&content_path, e))?;

        debug!(reference = %resource.reference(), path = %dir.display(), "Saved prompt");

        Ok(dir)
    }

    /// Whether this exact version is already stored
    pub async fn contains(&self, resource: &PromptResource) -> bool {
        let metadata_path = self
            .root
            .join(resource.slug())
            .join(resource.version())
            .join(METADATA_FILE);

        fs::try_exists(&metadata_path).await.unwrap_or(false)
    }

    /// Highest semver directory under `{root}/{slug}` holding a complete version
    async fn latest_version(&self, slug_dir: &Path) -> Result<Option<SemanticVersion>, DomainError> {
        let mut entries = match fs::read_dir(slug_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(slug_dir, e)),
        };

        let mut latest: Option<SemanticVersion> = None;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| storage_error(slug_dir, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);

            if !is_dir {
                continue;
            }

            let has_metadata = fs::try_exists(entry.path().join(METADATA_FILE))
                .await
                .unwrap_or(false);

            if !has_metadata {
                continue;
            }

            if let Some(version) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<SemanticVersion>().ok())
            {
                latest = latest.max(Some(version));
            }
        }

        Ok(latest)
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl PromptSource for LocalPromptSource {
    async fn fetch(
        &self,
        reference: &PromptReference,
    ) -> Result<Option<PromptResource>, DomainError> {
        let slug_dir = self.root.join(reference.slug());

        let version = match reference.version() {
            VersionSpec::Exact(version) => version,
            VersionSpec::Latest => match self.latest_version(&slug_dir).await? {
                Some(version) => version,
                None => return Ok(None),
            },
        };

        let dir = slug_dir.join(version.to_string());
        let metadata_path = dir.join(METADATA_FILE);

        let metadata = match fs::read(&metadata_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(&metadata_path, e)),
        };

        let mut payload: PromptPayload = serde_json::from_slice(&metadata).map_err(|e| {
            DomainError::storage(format!("{}: {}", metadata_path.display(), e))
        })?;

        let content_path = dir.join(CONTENT_FILE);
        let content = fs::read_to_string(&content_path)
            .await
            .map_err(|e| storage_error(&content_path, e))?;
        payload.content = Some(content);

        debug!(reference = %reference, path = %dir.display(), "Loaded prompt from directory");

        payload
            .into_resource(reference, PromptOrigin::Local, SOURCE_NAME)
            .map(Some)
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
