//! Prompt source trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{PromptReference, PromptResource};
use crate::domain::DomainError;

/// Anything that can resolve a reference to a prompt resource
///
/// `Ok(None)` means the source answered and the prompt does not exist there;
/// `Err` means the source could not answer.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PromptSource: Send + Sync + std::fmt::Debug {
    /// Fetch a prompt version; `latest` resolves to the highest version
    async fn fetch(&self, reference: &PromptReference)
        -> Result<Option<PromptResource>, DomainError>;

    /// Short name used in logs and errors
    fn source_name(&self) -> &'static str;
}

/// In-memory implementation of PromptSource
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use crate::domain::prompt::{PromptOrigin, VersionSpec};

    /// Prompt source backed by a map, for tests and embedded prompts
    #[derive(Debug, Default)]
    pub struct InMemoryPromptSource {
        prompts: RwLock<HashMap<String, Vec<PromptResource>>>,
    }

    impl InMemoryPromptSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_prompt(self, prompt: PromptResource) -> Self {
            self.insert(prompt);
            self
        }

        pub fn with_prompts(self, prompts: Vec<PromptResource>) -> Self {
            for prompt in prompts {
                self.insert(prompt);
            }
            self
        }

        /// Add or replace a prompt version
        pub fn insert(&self, prompt: PromptResource) {
            let prompt = prompt.with_origin(PromptOrigin::Memory);
            let mut map = self.prompts.write().unwrap();
            let versions = map.entry(prompt.slug().to_string()).or_default();

            versions.retain(|existing| existing.reference() != prompt.reference());
            versions.push(prompt);
        }

        pub fn len(&self) -> usize {
            self.prompts.read().unwrap().values().map(Vec::len).sum()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl PromptSource for InMemoryPromptSource {
        async fn fetch(
            &self,
            reference: &PromptReference,
        ) -> Result<Option<PromptResource>, DomainError> {
            let map = self.prompts.read().unwrap();
            let Some(versions) = map.get(reference.slug()) else {
                return Ok(None);
            };

            let found = match reference.version() {
                VersionSpec::Latest => versions.iter().max_by_key(|p| p.reference().exact_version()),
                VersionSpec::Exact(_) => versions.iter().find(|p| p.matches(reference)),
            };

            Ok(found.cloned())
        }

        fn source_name(&self) -> &'static str {
            "memory"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::in_memory::InMemoryPromptSource;
    use super::*;
    use crate::domain::prompt::SemanticVersion;

    fn prompt(slug: &str, version: (u64, u64, u64), content: &str) -> PromptResource {
        PromptResource::new(
            slug,
            SemanticVersion::new(version.0, version.1, version.2),
            content,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_exact_version() {
        let source = InMemoryPromptSource::new()
            .with_prompt(prompt("hello-world", (0, 0, 1), "v1"))
            .with_prompt(prompt("hello-world", (0, 0, 2), "v2"));

        let reference = PromptReference::parse("hello-world@0.0.1").unwrap();
        let fetched = source.fetch(&reference).await.unwrap().unwrap();

        assert_eq!(fetched.content(), "v1");
        assert_eq!(fetched.reference().to_string(), "hello-world@0.0.1");
    }

    #[tokio::test]
    async fn test_fetch_latest_uses_semver_order() {
        let source = InMemoryPromptSource::new().with_prompts(vec![
            prompt("summarize", (0, 9, 0), "old"),
            prompt("summarize", (0, 10, 0), "new"),
            prompt("summarize", (0, 2, 5), "older"),
        ]);

        let reference = PromptReference::parse("summarize").unwrap();
        let fetched = source.fetch(&reference).await.unwrap().unwrap();

        assert_eq!(fetched.content(), "new");
        assert_eq!(fetched.version(), "0.10.0");
    }

    #[tokio::test]
    async fn test_fetch_missing() {
        let source = InMemoryPromptSource::new().with_prompt(prompt("a", (1, 0, 0), "x"));

        let missing_slug = PromptReference::parse("b@1.0.0").unwrap();
        assert!(source.fetch(&missing_slug).await.unwrap().is_none());

        let missing_version = PromptReference::parse("a@2.0.0").unwrap();
        assert!(source.fetch(&missing_version).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_same_version() {
        let source = InMemoryPromptSource::new();
        source.insert(prompt("a", (1, 0, 0), "first"));
        source.insert(prompt("a", (1, 0, 0), "second"));

        assert_eq!(source.len(), 1);

        let reference = PromptReference::parse("a@1.0.0").unwrap();
        assert_eq!(
            source.fetch(&reference).await.unwrap().unwrap().content(),
            "second"
        );
    }
}
