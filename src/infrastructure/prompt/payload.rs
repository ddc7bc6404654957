//! Wire/disk representation of a prompt version

use serde::{Deserialize, Serialize};

use crate::domain::prompt::{
    PromptOrigin, PromptReference, PromptResource, SemanticVersion, VariableSchema,
};
use crate::domain::DomainError;

/// JSON body served by the prompt service and stored as `version.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptPayload {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    /// Absent in `version.json`, where content lives in its own file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

impl PromptPayload {
    /// Build a resource, checking it is the version that was asked for
    pub fn into_resource(
        self,
        requested: &PromptReference,
        origin: PromptOrigin,
        source: &str,
    ) -> Result<PromptResource, DomainError> {
        let version: SemanticVersion = self.version.parse().map_err(|e| {
            DomainError::provider(source, format!("Invalid version in payload: {}", e))
        })?;

        let content = self.content.ok_or_else(|| {
            DomainError::provider(source, format!("Prompt '{}' has no content", requested))
        })?;

        let mut resource = PromptResource::new(&self.slug, version, content)
            .map_err(|e| DomainError::provider(source, format!("Invalid slug in payload: {}", e)))?
            .with_variables(self.variables)
            .with_origin(origin);

        if let Some(name) = self.name {
            resource = resource.with_name(name);
        }

        if let Some(config) = self.config {
            resource = resource.with_config(config);
        }

        if !resource.matches(requested) {
            return Err(DomainError::provider(
                source,
                format!(
                    "Requested '{}' but received '{}'",
                    requested,
                    resource.reference()
                ),
            ));
        }

        Ok(resource)
    }
}

impl From<&PromptResource> for PromptPayload {
    fn from(resource: &PromptResource) -> Self {
        Self {
            slug: resource.slug().to_string(),
            name: Some(resource.name().to_string()),
            version: resource.version(),
            content: Some(resource.content().to_string()),
            variables: resource.variables().to_vec(),
            config: resource.config().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> PromptPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_into_resource() {
        let requested = PromptReference::parse("hello-world@0.0.1").unwrap();
        let resource = payload(json!({
            "slug": "hello-world",
            "name": "Hello World",
            "version": "0.0.1",
            "content": "Hello {{ name }}",
            "variables": [{"name": "name", "type": "string"}],
            "config": {"model": "openrouter/auto"}
        }))
        .into_resource(&requested, PromptOrigin::Remote, "remote")
        .unwrap();

        assert_eq!(resource.reference(), &requested);
        assert_eq!(resource.name(), "Hello World");
        assert_eq!(resource.variables().len(), 1);
        assert_eq!(resource.origin(), PromptOrigin::Remote);
        assert_eq!(resource.config().unwrap()["model"], "openrouter/auto");
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let requested = PromptReference::parse("hello-world@0.0.1").unwrap();
        let result = payload(json!({
            "slug": "hello-world",
            "version": "0.0.2",
            "content": "Hi"
        }))
        .into_resource(&requested, PromptOrigin::Remote, "remote");

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[test]
    fn test_latest_accepts_any_version() {
        let requested = PromptReference::parse("hello-world").unwrap();
        let resource = payload(json!({
            "slug": "hello-world",
            "version": "3.1.4",
            "content": "Hi"
        }))
        .into_resource(&requested, PromptOrigin::Remote, "remote")
        .unwrap();

        assert_eq!(resource.reference().to_string(), "hello-world@3.1.4");
        assert_eq!(resource.name(), "hello-world");
    }

    #[test]
    fn test_missing_content_is_rejected() {
        let requested = PromptReference::parse("a@1.0.0").unwrap();
        let result = payload(json!({"slug": "a", "version": "1.0.0"}))
            .into_resource(&requested, PromptOrigin::Local, "local");

        assert!(result.is_err());
    }

    #[test]
    fn test_from_resource() {
        let resource = PromptResource::new("a", SemanticVersion::new(1, 0, 0), "body").unwrap();
        let payload = PromptPayload::from(&resource);

        assert_eq!(payload.slug, "a");
        assert_eq!(payload.version, "1.0.0");
        assert_eq!(payload.content.as_deref(), Some("body"));
    }
}
