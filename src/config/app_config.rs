use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::DomainError;

/// Default prompt service endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.prompts.pmp.dev";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientSettings,
    pub logging: LoggingConfig,
}

/// Order in which the remote service and the local prompt directory are consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FetchStrategy {
    #[default]
    RemoteOnly,
    LocalOnly,
    LocalFirst,
    RemoteFirst,
}

impl FetchStrategy {
    pub fn uses_remote(&self) -> bool {
        !matches!(self, Self::LocalOnly)
    }

    pub fn uses_local(&self) -> bool {
        !matches!(self, Self::RemoteOnly)
    }
}

impl std::fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStrategy::RemoteOnly => write!(f, "remote-only"),
            FetchStrategy::LocalOnly => write!(f, "local-only"),
            FetchStrategy::LocalFirst => write!(f, "local-first"),
            FetchStrategy::RemoteFirst => write!(f, "remote-first"),
        }
    }
}

impl std::str::FromStr for FetchStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "remote-only" | "remote" => Ok(FetchStrategy::RemoteOnly),
            "local-only" | "local" => Ok(FetchStrategy::LocalOnly),
            "local-first" => Ok(FetchStrategy::LocalFirst),
            "remote-first" => Ok(FetchStrategy::RemoteFirst),
            _ => Err(DomainError::configuration(format!(
                "Unknown fetch strategy: {}. Valid strategies: remote-only, local-only, local-first, remote-first",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub api_key: String,
    pub tenant_id: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub strategy: FetchStrategy,
    /// Directory holding `{slug}/{version}/` prompt folders
    pub prompts_dir: Option<PathBuf>,
    /// Persist remotely fetched prompts into `prompts_dir`
    pub write_through: bool,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            tenant_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            strategy: FetchStrategy::default(),
            prompts_dir: None,
            write_through: false,
            cache: CacheSettings::default(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 3600,
            max_capacity: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("PROMPT_CLIENT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
