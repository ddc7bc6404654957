//! CLI module for the prompt client
//!
//! Subcommands:
//! - `get`: fetch a prompt version and print it as JSON
//! - `compile`: fetch a prompt version and render it with variables

pub mod compile;
pub mod get;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use config::ConfigError;
use tracing::warn;

use crate::config::{AppConfig, FetchStrategy};
use crate::infrastructure::logging;
use crate::PromptClient;

/// Fetch and compile versioned prompts
#[derive(Parser)]
#[command(name = "pmp-prompt-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Overrides for the loaded client configuration
#[derive(Args, Clone, Debug, Default)]
pub struct ClientArgs {
    /// SDK API key
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Tenant / project identifier
    #[arg(long, global = true)]
    pub tenant_id: Option<String>,

    /// Prompt service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// remote-only, local-only, local-first or remote-first
    #[arg(long, global = true)]
    pub strategy: Option<FetchStrategy>,

    /// Directory of locally stored prompts
    #[arg(long, global = true)]
    pub prompts_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a prompt and print it as JSON
    Get(get::GetArgs),

    /// Fetch a prompt and render it
    Compile(compile::CompileArgs),
}

impl ClientArgs {
    /// Apply command line overrides on top of file/env configuration
    pub fn apply(&self, config: &mut AppConfig) {
        let client = &mut config.client;

        if let Some(api_key) = &self.api_key {
            client.api_key = api_key.clone();
        }
        if let Some(tenant_id) = &self.tenant_id {
            client.tenant_id = tenant_id.clone();
        }
        if let Some(base_url) = &self.base_url {
            client.base_url = base_url.clone();
        }
        if let Some(strategy) = self.strategy {
            client.strategy = strategy;
        }
        if let Some(dir) = &self.prompts_dir {
            client.prompts_dir = Some(dir.clone());
        }
    }
}

/// Load configuration, initialize logging and build the client
pub fn init_client(args: &ClientArgs) -> anyhow::Result<PromptClient> {
    dotenvy::dotenv().ok();

    let (config, load_error) = resolve_config(AppConfig::load(), args);

    logging::init_logging(&config.logging);

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    Ok(PromptClient::from_settings(&config.client)?)
}

/// Apply overrides to the loaded configuration, falling back to defaults
/// and handing back the load error so it can be reported once logging is up
fn resolve_config(
    loaded: Result<AppConfig, ConfigError>,
    args: &ClientArgs,
) -> (AppConfig, Option<ConfigError>) {
    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    args.apply(&mut config);

    (config, load_error)
}
