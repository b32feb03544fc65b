pub mod validation;

use serde::{Deserialize, Serialize};

use self::validation::validate_config;

/// Error type for configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("API key is required")]
    NoApiKey,
    #[error("base URL is required")]
    NoBaseUrl,
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Client configuration.
///
/// Explicit values always take precedence over the environment; see
/// [`ClientConfig::with_env_fallback`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default)]
    pub use_env_proxy: bool,
}

fn default_timeout_secs() -> u64 {
    60
}
fn default_pool_max_idle_per_host() -> usize {
    16
}
fn default_pool_idle_timeout_secs() -> u64 {
    15
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            proxy: None,
            use_env_proxy: false,
        }
    }
}

const API_KEY_VARS: [&str; 2] = ["AI_API_KEY", "OPENAI_API_KEY"];
const BASE_URL_VARS: [&str; 2] = ["AI_BASE_URL", "OPENAI_BASE_URL"];

impl ClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(trim_base_url(url));
        self
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Fill unset credentials from the process environment.
    ///
    /// `AI_*` variables are preferred over their `OPENAI_*` counterparts.
    #[must_use]
    pub fn with_env_fallback(self) -> Self {
        self.with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ClientConfig::with_env_fallback`] with a caller-provided lookup.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
        };

        if self.api_key.as_deref().is_none_or(str::is_empty) {
            self.api_key = first_set(&API_KEY_VARS);
        }
        if self.base_url.as_deref().is_none_or(str::is_empty) {
            self.base_url = first_set(&BASE_URL_VARS).map(|url| trim_base_url(&url));
        }
        self
    }

    /// The API key, once validation has guaranteed it is present.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Load configuration from a YAML file, overlay the environment and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] when reading the file fails, [`ConfigError::Yaml`]
/// when parsing fails, or a validation error when the result is unusable.
pub fn load_config(path: &str) -> Result<ClientConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse configuration from YAML text, overlay the environment and validate it.
///
/// # Errors
///
/// Returns [`ConfigError::Yaml`] when parsing fails, or a validation error.
pub fn parse_config(contents: &str) -> Result<ClientConfig, ConfigError> {
    let mut config: ClientConfig = serde_yaml::from_str(contents)?;
    if let Some(url) = config.base_url.take() {
        config.base_url = Some(trim_base_url(&url));
    }
    let config = config.with_env_fallback();
    validate_config(&config)?;
    Ok(config)
}
