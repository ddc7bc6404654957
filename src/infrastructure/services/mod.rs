//! Client-facing services

mod prompt_client;

pub use prompt_client::{PromptClient, PromptClientBuilder};
