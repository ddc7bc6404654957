use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::domain::prompt::{PromptReference, PromptResource, PromptSource};
use crate::domain::DomainError;

/// Prompt source wrapper that caches exact versions with a TTL
///
/// `latest` lookups always reach the inner source.
#[derive(Debug)]
pub struct CachedPromptSource<S: PromptSource> {
    inner: S,
    cache: Cache<PromptReference, Arc<PromptResource>>,
}

impl<S: PromptSource> CachedPromptSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_capacity(inner, ttl, 1000)
    }

    pub fn with_capacity(inner: S, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(capacity)
            .build();

        Self { inner, cache }
    }

    /// Invalidate a specific prompt version
    pub async fn invalidate(&self, reference: &PromptReference) {
        self.cache.invalidate(reference).await;
    }

    /// Invalidate all cached prompts
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_size(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl<S: PromptSource> PromptSource for CachedPromptSource<S> {
    async fn fetch(
        &self,
        reference: &PromptReference,
    ) -> Result<Option<PromptResource>, DomainError> {
        if reference.is_latest() {
            return self.inner.fetch(reference).await;
        }

        if let Some(cached) = self.cache.get(reference).await {
            tracing::debug!(
                source = self.inner.source_name(),
                reference = %reference,
                "Cache hit for prompt"
            );
            return Ok(Some((*cached).clone()));
        }

        tracing::debug!(
            source = self.inner.source_name(),
            reference = %reference,
            "Cache miss, fetching prompt"
        );

        let fetched = self.inner.fetch(reference).await?;

        if let Some(resource) = &fetched {
            self.cache
                .insert(reference.clone(), Arc::new(resource.clone()))
                .await;
        }

        Ok(fetched)
    }

    fn source_name(&self) -> &'static str {
        self.inner.source_name()
    }
}
