//! PMP Prompt Client
//!
//! Fetches named, versioned prompts from a prompt management service and
//! compiles them locally with caller-supplied variables:
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::HashMap;
//! use pmp_prompt_client::PromptClient;
//!
//! let client = PromptClient::new("sdk_key", "tenant-id");
//! let prompt = client.get_prompt("hello-world@0.0.1").await?;
//! let compiled = prompt.compile(&HashMap::from([("name".to_string(), "John".to_string())]))?;
//! println!("{}", compiled);
//! # Ok(())
//! # }
//! ```
//!
//! Supports remote, local directory and mixed fetch strategies, in-memory
//! caching of immutable versions, and typed prompt definitions.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, ClientSettings, FetchStrategy};
pub use domain::{
    CompiledPrompt, Credentials, DomainError, PromptDefinition, PromptReference, PromptResource,
    PromptSource, TemplateError, TypedPrompt, VariableMapping,
};
pub use infrastructure::{PromptClient, PromptClientBuilder};
