//! Prompt source backed by the prompt service HTTP API

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::payload::PromptPayload;
use crate::config::DEFAULT_BASE_URL;
use crate::domain::prompt::{PromptOrigin, PromptReference, PromptResource, PromptSource};
use crate::domain::{Credentials, DomainError};
use crate::infrastructure::http_client::HttpClientTrait;

const SOURCE_NAME: &str = "remote";

/// Fetches prompt versions from `{base_url}/api/v1/prompts/{slug}/versions/{version}`
#[derive(Debug)]
pub struct RemotePromptSource<C: HttpClientTrait> {
    client: C,
    credentials: Credentials,
    base_url: String,
}

impl<C: HttpClientTrait> RemotePromptSource<C> {
    pub fn new(client: C, credentials: Credentials) -> Self {
        Self::with_base_url(client, credentials, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            credentials,
            base_url,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn prompt_url(&self, reference: &PromptReference) -> String {
        format!(
            "{}/api/v1/prompts/{}/versions/{}",
            self.base_url,
            reference.slug(),
            reference.version()
        )
    }
}

#[async_trait]
impl<C: HttpClientTrait> PromptSource for RemotePromptSource<C> {
    async fn fetch(
        &self,
        reference: &PromptReference,
    ) -> Result<Option<PromptResource>, DomainError> {
        if !self.credentials.has_api_key() {
            return Err(DomainError::credential("No API key configured"));
        }

        let url = self.prompt_url(reference);
        let auth_header = self.credentials.bearer();
        let request_id = Uuid::new_v4().to_string();

        debug!(reference = %reference, url = %url, request_id = %request_id, "Fetching prompt");

        let headers = vec![
            ("Authorization", auth_header.as_str()),
            ("X-Tenant-Id", self.credentials.tenant_id()),
            ("X-Request-Id", request_id.as_str()),
            ("Accept", "application/json"),
        ];

        let body = match self.client.get_json(&url, headers).await {
            Ok(body) => body,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        let payload: PromptPayload = serde_json::from_value(body).map_err(|e| {
            DomainError::provider(SOURCE_NAME, format!("Failed to parse prompt: {}", e))
        })?;

        payload
            .into_resource(reference, PromptOrigin::Remote, SOURCE_NAME)
            .map(Some)
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
