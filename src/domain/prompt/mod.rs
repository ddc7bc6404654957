//! Prompt domain - versioned prompt resources and template compilation

mod entity;
mod reference;
mod source;
mod template;
mod typed;

pub use entity::{
    CompiledPrompt, PromptOrigin, PromptResource, VariableMapping, VariableSchema, VariableType,
};
pub use reference::{
    validate_slug, PromptReference, ReferenceError, SemanticVersion, VersionSpec, LATEST,
    MAX_SLUG_LENGTH,
};
pub use source::in_memory::InMemoryPromptSource;
pub use source::PromptSource;
pub use template::{extract_variables, render_template, PromptTemplate, PromptVariable, TemplateError};
pub use typed::{to_mapping, PromptDefinition, TypedPrompt};

#[cfg(test)]
pub use source::MockPromptSource;
