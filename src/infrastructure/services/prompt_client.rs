//! Prompt client - fetches prompt versions and compiles them

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::config::{ClientSettings, FetchStrategy};
use crate::domain::prompt::{
    CompiledPrompt, PromptDefinition, PromptReference, PromptResource, PromptSource, TypedPrompt,
    VariableMapping,
};
use crate::domain::{Credentials, DomainError};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::prompt::{CachedPromptSource, LocalPromptSource, RemotePromptSource};

/// Client scoped to one tenant's prompts
///
/// Construction never touches the network; credential problems surface on
/// the first fetch.
#[derive(Clone)]
pub struct PromptClient {
    credentials: Credentials,
    strategy: FetchStrategy,
    remote: Option<Arc<dyn PromptSource>>,
    local: Option<Arc<dyn PromptSource>>,
    write_through: Option<LocalPromptSource>,
}

impl PromptClient {
    /// Remote-only client against the default service URL, with caching
    pub fn new(api_key: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        let credentials = Credentials::new(api_key, tenant_id);
        let defaults = ClientSettings::default();
        let remote = CachedPromptSource::with_capacity(
            RemotePromptSource::new(HttpClient::new(), credentials.clone()),
            Duration::from_secs(defaults.cache.ttl_secs),
            defaults.cache.max_capacity,
        );

        Self {
            credentials,
            strategy: FetchStrategy::RemoteOnly,
            remote: Some(Arc::new(remote)),
            local: None,
            write_through: None,
        }
    }

    pub fn builder(credentials: Credentials) -> PromptClientBuilder {
        PromptClientBuilder::new(credentials)
    }

    /// Build a client from loaded configuration
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, DomainError> {
        let credentials = Credentials::new(settings.api_key.clone(), settings.tenant_id.clone());
        let mut builder = Self::builder(credentials.clone()).strategy(settings.strategy);

        if settings.strategy.uses_remote() {
            let http = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;
            let remote = RemotePromptSource::with_base_url(http, credentials, &settings.base_url);

            builder = if settings.cache.enabled {
                builder.remote_source(CachedPromptSource::with_capacity(
                    remote,
                    Duration::from_secs(settings.cache.ttl_secs),
                    settings.cache.max_capacity,
                ))
            } else {
                builder.remote_source(remote)
            };
        }

        if let Some(dir) = &settings.prompts_dir {
            if settings.strategy.uses_local() {
                builder = builder.local_source(LocalPromptSource::new(dir));
            }

            if settings.write_through {
                builder = builder.write_through(LocalPromptSource::new(dir));
            }
        }

        builder.build()
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Fetch a prompt by `slug@version` (or bare `slug` for latest)
    pub async fn get_prompt(&self, reference: &str) -> Result<PromptResource, DomainError> {
        let reference =
            PromptReference::parse(reference).map_err(|e| DomainError::invalid_id(e.to_string()))?;

        self.fetch(&reference).await
    }

    /// Fetch a prompt described by a [`PromptDefinition`]
    pub async fn get_typed<P: PromptDefinition>(&self) -> Result<TypedPrompt<P>, DomainError> {
        let reference = P::reference().map_err(|e| DomainError::invalid_id(e.to_string()))?;

        Ok(TypedPrompt::new(self.fetch(&reference).await?))
    }

    /// Fetch and compile in one call
    pub async fn compile(
        &self,
        reference: &str,
        variables: &VariableMapping,
    ) -> Result<CompiledPrompt, DomainError> {
        self.get_prompt(reference)
            .await?
            .compile(variables)
            .map_err(|e| DomainError::validation(e.to_string()))
    }

    #[instrument(skip(self, reference), fields(reference = %reference, strategy = %self.strategy))]
    pub async fn fetch(&self, reference: &PromptReference) -> Result<PromptResource, DomainError> {
        let fetched = match self.strategy {
            FetchStrategy::RemoteOnly => self.fetch_remote(reference).await?,
            FetchStrategy::LocalOnly => self.local()?.fetch(reference).await?,
            FetchStrategy::LocalFirst => match self.local()?.fetch(reference).await? {
                Some(resource) => Some(resource),
                None => self.fetch_remote(reference).await?,
            },
            FetchStrategy::RemoteFirst => match self.fetch_remote(reference).await {
                Ok(Some(resource)) => Some(resource),
                Ok(None) => self.local()?.fetch(reference).await?,
                Err(e) => {
                    warn!(error = %e, "Remote fetch failed, falling back to local prompts");

                    match self.local()?.fetch(reference).await? {
                        Some(resource) => Some(resource),
                        None => return Err(e),
                    }
                }
            },
        };

        let resource = fetched
            .ok_or_else(|| DomainError::not_found(format!("Prompt '{}' not found", reference)))?;

        info!(
            resolved = %resource.reference(),
            origin = ?resource.origin(),
            "Fetched prompt"
        );

        Ok(resource)
    }

    async fn fetch_remote(
        &self,
        reference: &PromptReference,
    ) -> Result<Option<PromptResource>, DomainError> {
        let fetched = self.remote()?.fetch(reference).await?;

        if let (Some(resource), Some(writer)) = (&fetched, &self.write_through) {
            // Versions are immutable, so a stored copy is never rewritten
            if !writer.contains(resource).await {
                if let Err(e) = writer.save(resource).await {
                    warn!(error = %e, "Failed to persist prompt locally");
                }
            }
        }

        Ok(fetched)
    }

    fn remote(&self) -> Result<&Arc<dyn PromptSource>, DomainError> {
        self.remote
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No remote prompt source configured"))
    }

    fn local(&self) -> Result<&Arc<dyn PromptSource>, DomainError> {
        self.local
            .as_ref()
            .ok_or_else(|| DomainError::configuration("No local prompt directory configured"))
    }
}

impl fmt::Debug for PromptClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptClient")
            .field("credentials", &self.credentials)
            .field("strategy", &self.strategy)
            .field("remote", &self.remote.is_some())
            .field("local", &self.local.is_some())
            .field("write_through", &self.write_through.as_ref().map(|w| w.root()))
            .finish()
    }
}

/// Builder for [`PromptClient`] with explicit sources
pub struct PromptClientBuilder {
    credentials: Credentials,
    strategy: FetchStrategy,
    remote: Option<Arc<dyn PromptSource>>,
    local: Option<Arc<dyn PromptSource>>,
    write_through: Option<LocalPromptSource>,
}

impl PromptClientBuilder {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            strategy: FetchStrategy::default(),
            remote: None,
            local: None,
            write_through: None,
        }
    }

    pub fn strategy(mut self, strategy: FetchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn remote_source(mut self, source: impl PromptSource + 'static) -> Self {
        self.remote = Some(Arc::new(source));
        self
    }

    pub fn local_source(mut self, source: impl PromptSource + 'static) -> Self {
        self.local = Some(Arc::new(source));
        self
    }

    /// Persist remotely fetched prompts into this directory
    pub fn write_through(mut self, target: LocalPromptSource) -> Self {
        self.write_through = Some(target);
        self
    }

    pub fn build(self) -> Result<PromptClient, DomainError> {
        if self.strategy.uses_remote() && self.remote.is_none() {
            return Err(DomainError::configuration(format!(
                "Fetch strategy '{}' requires a remote prompt source",
                self.strategy
            )));
        }

        if self.strategy.uses_local() && self.local.is_none() {
            return Err(DomainError::configuration(format!(
                "Fetch strategy '{}' requires a local prompt directory",
                self.strategy
            )));
        }

        Ok(PromptClient {
            credentials: self.credentials,
            strategy: self.strategy,
            remote: self.remote,
            local: self.local,
            write_through: self.write_through,
        })
    }
}
