//! Prompt template parsing and rendering
//!
//! Supports variable syntax:
//! - `{{ name }}` - Required variable, error if not provided
//! - `{{ name | default("value") }}` - Optional variable with inline default

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

/// Regex to match `{{ name }}` or `{{ name | default("value") }}`
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\{\{\s*([a-zA-Z_][a-zA-Z0-9_-]*)\s*(?:\|\s*default\(\s*"([^"]*)"\s*\)\s*)?\}\}"#,
    )
    .unwrap()
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },

    #[error("Invalid value for variable '{name}': expected {expected}")]
    InvalidValue { name: String, expected: String },

    #[error("Invalid variables: {message}")]
    InvalidVariables { message: String },

    #[error("Template parsing error: {message}")]
    ParseError { message: String },
}

/// A placeholder found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariable {
    /// Variable name
    pub name: String,
    /// Inline default if provided
    pub default: Option<String>,
    /// Whether any occurrence lacks a default
    pub required: bool,
}

impl PromptVariable {
    /// Create a required variable
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            required: true,
        }
    }

    /// Create an optional variable with a default
    pub fn with_default(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
            required: false,
        }
    }
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// Original template content
    content: String,
    /// Parsed variables, in order of first appearance
    variables: Vec<PromptVariable>,
}

impl PromptTemplate {
    /// Parse a template string and extract variables
    pub fn parse(content: impl Into<String>) -> Result<Self, TemplateError> {
        let content = content.into();
        let mut variables: Vec<PromptVariable> = Vec::new();
        let mut seen_names = HashSet::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();
            let default = cap.get(2).map(|m| m.as_str().to_string());

            if !seen_names.insert(name.clone()) {
                // A bare occurrence makes a defaulted variable required
                if default.is_none() {
                    if let Some(existing) = variables.iter_mut().find(|v| v.name == name) {
                        existing.required = true;
                    }
                }
                continue;
            }

            let variable = match default {
                Some(default_value) => PromptVariable::with_default(&name, default_value),
                None => PromptVariable::required(&name),
            };

            variables.push(variable);
        }

        let remainder = VARIABLE_PATTERN.replace_all(&content, "");
        if let Some(offset) = remainder.find("{{") {
            let snippet: String = remainder[offset..].chars().take(30).collect();
            return Err(TemplateError::ParseError {
                message: format!("malformed placeholder near '{}'", snippet),
            });
        }

        Ok(Self { content, variables })
    }

    /// Get the original template content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get all parsed variables
    pub fn variables(&self) -> &[PromptVariable] {
        &self.variables
    }

    /// Get only required variables (no default value)
    pub fn required_variables(&self) -> Vec<&PromptVariable> {
        self.variables.iter().filter(|v| v.required).collect()
    }

    /// Check if the template has any variables
    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Render the template with provided values
    ///
    /// Substitution is a single pass over the original content, so values
    /// that themselves contain placeholders are inserted literally.
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        if let Some(missing) = self
            .variables
            .iter()
            .find(|v| v.required && !values.contains_key(&v.name))
        {
            return Err(TemplateError::MissingVariable {
                name: missing.name.clone(),
            });
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures| {
            values
                .get(&cap[1])
                .map(String::as_str)
                .or_else(|| cap.get(2).map(|m| m.as_str()))
                .unwrap_or_default()
                .to_string()
        });

        Ok(rendered.into_owned())
    }
}

/// Convenience function to render a template string directly
pub fn render_template(
    template: &str,
    values: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    PromptTemplate::parse(template)?.render(values)
}

/// Extract variable names from a template string
pub fn extract_variables(template: &str) -> Vec<PromptVariable> {
    match PromptTemplate::parse(template) {
        Ok(t) => t.variables,
        Err(_) => Vec::new(),
    }
}
