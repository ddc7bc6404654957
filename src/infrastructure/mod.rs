//! Infrastructure layer - External service implementations

pub mod http_client;
pub mod logging;
pub mod prompt;
pub mod services;

pub use http_client::{HttpClient, HttpClientTrait};
pub use services::{PromptClient, PromptClientBuilder};
