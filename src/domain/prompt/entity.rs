//! Prompt resource entity and compilation output

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reference::{PromptReference, ReferenceError, SemanticVersion};
use super::template::{PromptTemplate, TemplateError};

/// Caller-supplied variable values
pub type VariableMapping = HashMap<String, String>;

/// Declared type of a prompt variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[default]
    String,
    Number,
    Boolean,
    Json,
}

impl VariableType {
    /// Check a raw string value against this type
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::String => true,
            Self::Number => value.trim().parse::<f64>().is_ok(),
            Self::Boolean => matches!(value, "true" | "false"),
            Self::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// A variable declared by the prompt service for a prompt version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSchema {
    pub name: String,
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

fn default_required() -> bool {
    true
}

impl VariableSchema {
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            required: true,
            default: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// Where a prompt resource was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptOrigin {
    Remote,
    Local,
    Memory,
}

/// A specific, immutable version of a named prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResource {
    /// Resolved reference (never `latest`)
    reference: PromptReference,
    /// Display name
    name: String,
    /// Template content
    content: String,
    /// Declared variables
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    variables: Vec<VariableSchema>,
    /// Opaque model configuration attached to the version
    #[serde(skip_serializing_if = "Option::is_none", default)]
    config: Option<serde_json::Value>,
    origin: PromptOrigin,
    fetched_at: DateTime<Utc>,
}

impl PromptResource {
    /// Create a new resource for an exact prompt version
    pub fn new(
        slug: &str,
        version: SemanticVersion,
        content: impl Into<String>,
    ) -> Result<Self, ReferenceError> {
        let reference = PromptReference::exact(slug, version)?;

        Ok(Self {
            name: slug.to_string(),
            reference,
            content: content.into(),
            variables: Vec::new(),
            config: None,
            origin: PromptOrigin::Memory,
            fetched_at: Utc::now(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_variables(mut self, variables: Vec<VariableSchema>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_variable(mut self, variable: VariableSchema) -> Self {
        self.variables.push(variable);
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_origin(mut self, origin: PromptOrigin) -> Self {
        self.origin = origin;
        self
    }

    // Getters

    pub fn reference(&self) -> &PromptReference {
        &self.reference
    }

    pub fn slug(&self) -> &str {
        self.reference.slug()
    }

    /// Resolved version; resources are always built from exact references
    pub fn version(&self) -> String {
        self.reference.version().to_string()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[VariableSchema] {
        &self.variables
    }

    pub fn config(&self) -> Option<&serde_json::Value> {
        self.config.as_ref()
    }

    pub fn origin(&self) -> PromptOrigin {
        self.origin
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Whether this resource satisfies the requested reference
    pub fn matches(&self, requested: &PromptReference) -> bool {
        self.slug() == requested.slug()
            && (requested.is_latest() || self.reference.version() == requested.version())
    }

    /// Render the template with the given variables
    ///
    /// Values are resolved caller first, then schema default, then inline
    /// template default. Supplied variables the prompt does not use are
    /// ignored and reported in [`CompiledPrompt::unused_variables`].
    pub fn compile(&self, variables: &VariableMapping) -> Result<CompiledPrompt, TemplateError> {
        let template = PromptTemplate::parse(self.content.as_str())?;
        let mut resolved: VariableMapping = HashMap::new();

        for schema in &self.variables {
            match variables.get(&schema.name).or(schema.default.as_ref()) {
                Some(value) => {
                    if !schema.var_type.accepts(value) {
                        return Err(TemplateError::InvalidValue {
                            name: schema.name.clone(),
                            expected: schema.var_type.to_string(),
                        });
                    }
                    resolved.insert(schema.name.clone(), value.clone());
                }
                None if schema.required => {
                    return Err(TemplateError::MissingVariable {
                        name: schema.name.clone(),
                    });
                }
                None => {}
            }
        }

        for placeholder in template.variables() {
            if resolved.contains_key(&placeholder.name) {
                continue;
            }

            // A bare occurrence anywhere makes the name required, even when
            // another occurrence carries an inline default.
            if let Some(value) = variables.get(&placeholder.name) {
                resolved.insert(placeholder.name.clone(), value.clone());
            } else if let (false, Some(default)) = (placeholder.required, &placeholder.default) {
                resolved.insert(placeholder.name.clone(), default.clone());
            } else if self.declares_optional(&placeholder.name) {
                resolved.insert(placeholder.name.clone(), String::new());
            }
        }

        let content = template.render(&resolved)?;

        let mut unused_variables: Vec<String> = variables
            .keys()
            .filter(|name| !resolved.contains_key(*name))
            .cloned()
            .collect();
        unused_variables.sort();

        if !unused_variables.is_empty() {
            tracing::debug!(
                reference = %self.reference,
                unused = ?unused_variables,
                "Ignoring variables not used by prompt"
            );
        }

        Ok(CompiledPrompt {
            reference: self.reference.clone(),
            content,
            variables: resolved.into_iter().collect(),
            unused_variables,
        })
    }

    fn declares_optional(&self, name: &str) -> bool {
        self.variables
            .iter()
            .any(|schema| schema.name == name && !schema.required)
    }
}

/// Rendered prompt output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledPrompt {
    pub reference: PromptReference,
    pub content: String,
    /// Final values used, including applied defaults
    pub variables: BTreeMap<String, String>,
    /// Supplied names the prompt does not reference
    pub unused_variables: Vec<String>,
}

impl fmt::Display for CompiledPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> PromptResource {
        PromptResource::new(
            "hello-world",
            SemanticVersion::new(0, 0, 1),
            "Hello, {{ name }}! Nice to meet you.",
        )
        .unwrap()
        .with_name("Hello World")
        .with_variable(VariableSchema::new("name", VariableType::String))
    }

    fn vars(pairs: &[(&str, &str)]) -> VariableMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resource_creation() {
        let prompt = hello_world();

        assert_eq!(prompt.reference().to_string(), "hello-world@0.0.1");
        assert_eq!(prompt.slug(), "hello-world");
        assert_eq!(prompt.version(), "0.0.1");
        assert_eq!(prompt.name(), "Hello World");
        assert_eq!(prompt.origin(), PromptOrigin::Memory);
        assert!(prompt.config().is_none());
    }

    #[test]
    fn test_compile_substitutes_name() {
        let compiled = hello_world().compile(&vars(&[("name", "John")])).unwrap();

        assert_eq!(compiled.content, "Hello, John! Nice to meet you.");
        assert_eq!(compiled.reference.to_string(), "hello-world@0.0.1");
        assert_eq!(compiled.variables.get("name"), Some(&"John".to_string()));
        assert!(compiled.unused_variables.is_empty());
    }

    #[test]
    fn test_compile_missing_variable_fails() {
        let result = hello_world().compile(&VariableMapping::new());

        assert_eq!(
            result,
            Err(TemplateError::MissingVariable {
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn test_compile_bare_occurrence_overrides_inline_default() {
        let missing = Err(TemplateError::MissingVariable {
            name: "name".to_string(),
        });

        for content in [
            r#"{{ name | default("x") }} and {{ name }}"#,
            r#"{{ name }} and {{ name | default("x") }}"#,
        ] {
            let prompt = PromptResource::new("dup", SemanticVersion::new(1, 0, 0), content).unwrap();

            assert_eq!(prompt.compile(&VariableMapping::new()), missing, "{}", content);
            assert_eq!(
                prompt.compile(&vars(&[("name", "y")])).unwrap().content,
                "y and y"
            );
        }
    }

    #[test]
    fn test_compile_missing_placeholder_without_schema_fails() {
        let prompt = PromptResource::new("bare", SemanticVersion::new(1, 0, 0), "Hi {{ who }}")
            .unwrap();

        assert!(matches!(
            prompt.compile(&VariableMapping::new()),
            Err(TemplateError::MissingVariable { .. })
        ));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let prompt = hello_world();
        let mapping = vars(&[("name", "John"), ("extra", "x")]);

        let first = prompt.compile(&mapping).unwrap();
        let second = prompt.compile(&mapping).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compile_reports_unused_variables() {
        let compiled = hello_world()
            .compile(&vars(&[("name", "John"), ("zeta", "1"), ("alpha", "2")]))
            .unwrap();

        assert_eq!(compiled.content, "Hello, John! Nice to meet you.");
        assert_eq!(compiled.unused_variables, vec!["alpha", "zeta"]);
        assert!(!compiled.variables.contains_key("zeta"));
    }

    #[test]
    fn test_compile_applies_schema_default() {
        let prompt = PromptResource::new(
            "greeting",
            SemanticVersion::new(1, 2, 0),
            r#"{{ greeting }}, {{ name | default("friend") }}"#,
        )
        .unwrap()
        .with_variable(
            VariableSchema::new("greeting", VariableType::String)
                .optional()
                .with_default("Hey"),
        );

        let compiled = prompt.compile(&VariableMapping::new()).unwrap();
        assert_eq!(compiled.content, "Hey, friend");
        assert_eq!(compiled.variables.get("greeting"), Some(&"Hey".to_string()));
        assert_eq!(compiled.variables.get("name"), Some(&"friend".to_string()));
    }

    #[test]
    fn test_optional_schema_variable_renders_empty() {
        let prompt = PromptResource::new(
            "signoff",
            SemanticVersion::new(0, 0, 3),
            "Thanks.{{ signature }}",
        )
        .unwrap()
        .with_variable(VariableSchema::new("signature", VariableType::String).optional());

        assert_eq!(
            prompt.compile(&VariableMapping::new()).unwrap().content,
            "Thanks."
        );
    }

    #[test]
    fn test_compile_checks_declared_types() {
        let prompt = PromptResource::new(
            "counter",
            SemanticVersion::new(0, 1, 0),
            "Count to {{ n }} loudly={{ loud }}",
        )
        .unwrap()
        .with_variables(vec![
            VariableSchema::new("n", VariableType::Number),
            VariableSchema::new("loud", VariableType::Boolean),
        ]);

        let ok = prompt.compile(&vars(&[("n", "3"), ("loud", "true")])).unwrap();
        assert_eq!(ok.content, "Count to 3 loudly=true");

        assert_eq!(
            prompt.compile(&vars(&[("n", "three"), ("loud", "true")])),
            Err(TemplateError::InvalidValue {
                name: "n".to_string(),
                expected: "number".to_string()
            })
        );
        assert!(prompt.compile(&vars(&[("n", "3"), ("loud", "yes")])).is_err());
    }

    #[test]
    fn test_matches_reference() {
        let prompt = hello_world();

        assert!(prompt.matches(&"hello-world@0.0.1".parse().unwrap()));
        assert!(prompt.matches(&"hello-world".parse().unwrap()));
        assert!(!prompt.matches(&"hello-world@0.0.2".parse().unwrap()));
        assert!(!prompt.matches(&"other@0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_variable_schema_deserialize_defaults() {
        let schema: VariableSchema = serde_json::from_str(r#"{"name": "topic"}"#).unwrap();

        assert_eq!(schema.var_type, VariableType::String);
        assert!(schema.required);
        assert!(schema.default.is_none());
    }

    #[test]
    fn test_compiled_prompt_display() {
        let compiled = hello_world().compile(&vars(&[("name", "John")])).unwrap();
        assert_eq!(compiled.to_string(), "Hello, John! Nice to meet you.");
    }
}
