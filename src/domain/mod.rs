//! Domain layer - Core types, errors and traits

pub mod credentials;
pub mod error;
pub mod prompt;

pub use credentials::Credentials;
pub use error::DomainError;
pub use prompt::{
    CompiledPrompt, InMemoryPromptSource, PromptDefinition, PromptOrigin, PromptReference,
    PromptResource, PromptSource, PromptTemplate, PromptVariable, ReferenceError,
    SemanticVersion, TemplateError, TypedPrompt, VariableMapping, VariableSchema, VariableType,
    VersionSpec,
};
