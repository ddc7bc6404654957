//! Compile-time described prompts
//!
//! A tenant's known prompts can be modelled as types implementing
//! [`PromptDefinition`], so the variables passed to `compile` are checked by
//! the compiler instead of at render time.

use std::marker::PhantomData;

use serde::Serialize;

use super::entity::{CompiledPrompt, PromptResource, VariableMapping};
use super::reference::{PromptReference, ReferenceError};
use super::template::TemplateError;

/// A prompt whose slug, version and variable shape are known up front
pub trait PromptDefinition {
    const SLUG: &'static str;

    /// Exact version or `latest`
    const VERSION: &'static str;

    type Variables: Serialize;

    fn reference() -> Result<PromptReference, ReferenceError> {
        PromptReference::parse(&format!("{}@{}", Self::SLUG, Self::VERSION))
    }
}

/// A fetched prompt bound to its definition
#[derive(Debug, Clone)]
pub struct TypedPrompt<P: PromptDefinition> {
    resource: PromptResource,
    _definition: PhantomData<P>,
}

impl<P: PromptDefinition> TypedPrompt<P> {
    pub fn new(resource: PromptResource) -> Self {
        Self {
            resource,
            _definition: PhantomData,
        }
    }

    pub fn resource(&self) -> &PromptResource {
        &self.resource
    }

    pub fn into_resource(self) -> PromptResource {
        self.resource
    }

    /// Render with the definition's variable type
    pub fn compile(&self, variables: &P::Variables) -> Result<CompiledPrompt, TemplateError> {
        self.resource.compile(&to_mapping(variables)?)
    }
}

/// Flatten a serializable struct into a variable mapping
///
/// Strings are taken verbatim, other values by their JSON text, `null`
/// entries are dropped.
pub fn to_mapping<T: Serialize>(variables: &T) -> Result<VariableMapping, TemplateError> {
    let value = serde_json::to_value(variables).map_err(|e| TemplateError::InvalidVariables {
        message: e.to_string(),
    })?;

    let serde_json::Value::Object(map) = value else {
        return Err(TemplateError::InvalidVariables {
            message: "variables must serialize to an object".to_string(),
        });
    };

    Ok(map
        .into_iter()
        .filter_map(|(name, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((name, s)),
            other => Some((name, other.to_string())),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::prompt::{SemanticVersion, VariableSchema, VariableType};

    struct HelloWorld;

    #[derive(Serialize)]
    struct HelloWorldVariables {
        name: String,
    }

    impl PromptDefinition for HelloWorld {
        const SLUG: &'static str = "hello-world";
        const VERSION: &'static str = "0.0.1";
        type Variables = HelloWorldVariables;
    }

    #[derive(Serialize)]
    struct ReportVariables {
        title: String,
        pages: u32,
        draft: bool,
        footer: Option<String>,
    }

    #[test]
    fn test_definition_reference() {
        let reference = HelloWorld::reference().unwrap();
        assert_eq!(reference.to_string(), "hello-world@0.0.1");
    }

    #[test]
    fn test_typed_compile() {
        let resource =
            PromptResource::new("hello-world", SemanticVersion::new(0, 0, 1), "Hi {{ name }}")
                .unwrap()
                .with_variable(VariableSchema::new("name", VariableType::String));

        let prompt = TypedPrompt::<HelloWorld>::new(resource);
        let compiled = prompt
            .compile(&HelloWorldVariables {
                name: "John".to_string(),
            })
            .unwrap();

        assert_eq!(compiled.content, "Hi John");
    }

    #[test]
    fn test_to_mapping_flattens_scalars() {
        let mapping = to_mapping(&ReportVariables {
            title: "Q3".to_string(),
            pages: 12,
            draft: false,
            footer: None,
        })
        .unwrap();

        assert_eq!(mapping.get("title"), Some(&"Q3".to_string()));
        assert_eq!(mapping.get("pages"), Some(&"12".to_string()));
        assert_eq!(mapping.get("draft"), Some(&"false".to_string()));
        assert!(!mapping.contains_key("footer"));
    }

    #[test]
    fn test_to_mapping_rejects_non_object() {
        let result = to_mapping(&vec!["a", "b"]);
        assert!(matches!(
            result,
            Err(TemplateError::InvalidVariables { .. })
        ));
    }
}
