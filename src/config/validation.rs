use super::{ClientConfig, ConfigError};

/// Validate a client config, returning an error if any rule is violated.
///
/// # Errors
///
/// Returns [`ConfigError::NoApiKey`] when no key is configured, or
/// [`ConfigError::Validation`] when any other invariant is violated.
pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    validate_api_key(config)?;
    validate_base_url(config)?;
    validate_http_settings(config)?;
    Ok(())
}

fn validation_err(msg: impl Into<String>) -> ConfigError {
    ConfigError::Validation(msg.into())
}

fn validate_api_key(config: &ClientConfig) -> Result<(), ConfigError> {
    match config.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::NoApiKey),
    }
}

fn validate_base_url(config: &ClientConfig) -> Result<(), ConfigError> {
    let Some(base_url) = config.base_url.as_deref() else {
        return Ok(());
    };
    if base_url.is_empty() {
        return Ok(());
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(validation_err(format!(
            "base_url must start with http:// or https://, got '{base_url}'"
        )));
    }
    url::Url::parse(base_url)
        .map_err(|e| validation_err(format!("base_url '{base_url}' is invalid: {e}")))?;
    Ok(())
}

fn validate_http_settings(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(validation_err("timeout_secs must be greater than 0"));
    }
    if config.pool_max_idle_per_host == 0 {
        return Err(validation_err(
            "pool_max_idle_per_host must be greater than 0",
        ));
    }
    if let Some(proxy) = config.proxy.as_deref() {
        url::Url::parse(proxy)
            .map_err(|e| validation_err(format!("proxy '{proxy}' is invalid: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ClientConfig {
        ClientConfig::new()
            .with_api_key("sk-test")
            .with_base_url("https://api.openai.com/v1")
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_missing_api_key() {
        let mut config = valid();
        config.api_key = None;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::NoApiKey)
        ));

        config.api_key = Some("   ".into());
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::NoApiKey)
        ));
    }

    #[test]
    fn test_base_url_is_optional() {
        let mut config = valid();
        config.base_url = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_base_url_scheme() {
        let config = valid().with_base_url("ftp://example.com");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_proxy() {
        let config = valid().with_proxy("not a url");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_pool() {
        let mut config = valid();
        config.pool_max_idle_per_host = 0;
        assert!(validate_config(&config).is_err());
    }
}
