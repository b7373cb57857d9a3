use std::env;
use thiserror::Error;

use hcplog_tui::api::client::ApiClient;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API URL '{0}': must start with http:// or https://")]
    InvalidApiUrl(String),
    #[error("Tick rate must be at least 50ms, got {0}")]
    TickRateTooLow(u64),
}

/// Runtime configuration: CLI flags first, then environment, then the
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub tick_rate_ms: u64,
    pub show_timestamps: bool,
}

impl Config {
    pub fn resolve(
        api_url_flag: Option<String>,
        tick_rate_ms: u64,
        show_timestamps: bool,
    ) -> Result<Self, ConfigError> {
        let api_url = api_url_flag
            .or_else(|| env::var("HCPLOG_API_URL").ok())
            .unwrap_or_else(|| ApiClient::DEFAULT_BASE_URL.to_string());
        let api_url = api_url.trim_end_matches('/').to_string();

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidApiUrl(api_url));
        }
        if tick_rate_ms < 50 {
            return Err(ConfigError::TickRateTooLow(tick_rate_ms));
        }

        Ok(Config {
            api_url,
            tick_rate_ms,
            show_timestamps,
        })
    }
}
