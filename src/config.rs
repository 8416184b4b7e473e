use crate::engine::{RagParameters, RoiParameters, TranslationParameters};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "cost-projector.toml";

/// Environment variable prefix, e.g. `COST_PROJECTOR__ROI__USER_COUNT=500`
pub const ENV_PREFIX: &str = "COST_PROJECTOR";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
    #[serde(default)]
    pub translation: TranslationParameters,
    #[serde(default)]
    pub rag: RagParameters,
    #[serde(default)]
    pub roi: RoiParameters,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Narrative commentary provider (Anthropic Messages API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NarrativeConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Quiet period after the last parameter change before a commentary
    /// request is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            api_key: None,
            api_version: default_api_version(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout_seconds(),
            debounce_ms: default_debounce_ms(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry policy for rate-limited commentary calls
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Additional attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com/v1".to_string()
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_model() -> String {
    "claude-3-5-haiku-20241022".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_debounce_ms() -> u64 {
    1500
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_max_backoff_ms() -> u64 {
    8000
}

/// Load configuration: built-in defaults, then the optional file at `path`,
/// then `COST_PROJECTOR__*` environment variables.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    match cfg.logging.format.as_str() {
        "pretty" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'pretty' or 'json'", other),
    }

    let narrative = &cfg.narrative;
    if narrative.model.is_empty() {
        anyhow::bail!("Narrative model cannot be empty");
    }
    if narrative.timeout_seconds == 0 {
        anyhow::bail!("Narrative timeout_seconds must be >= 1");
    }
    if narrative.enabled
        && narrative
            .api_key
            .as_deref()
            .map(str::is_empty)
            .unwrap_or(true)
    {
        anyhow::bail!("Narrative is enabled but no api_key is configured");
    }
    if narrative.retry.max_retries > 0 && narrative.retry.initial_backoff_ms == 0 {
        anyhow::bail!("Narrative retry initial_backoff_ms must be >= 1 when retries are enabled");
    }

    // Parameter sets are normalised on deserialisation and never rejected
    Ok(())
}
