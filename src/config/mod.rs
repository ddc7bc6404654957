mod app_config;

pub use app_config::{
    AppConfig, CacheSettings, ClientSettings, FetchStrategy, LogFormat, LoggingConfig,
    DEFAULT_BASE_URL,
};
