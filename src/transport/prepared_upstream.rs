use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientError;
use crate::protocol::anthropic::{ANTHROPIC_API_VERSION, ANTHROPIC_DEFAULT_BASE_URL};
use crate::protocol::canonical::Dialect;

/// Endpoint URL and static headers for one dialect, computed once per client.
#[derive(Debug, Clone)]
pub struct PreparedUpstream {
    dialect: Dialect,
    url: url::Url,
    headers: HeaderMap,
}

impl PreparedUpstream {
    /// Prepare the upstream for `dialect` from client configuration.
    ///
    /// The OpenAI dialect requires a base URL; the Anthropic dialect falls
    /// back to [`ANTHROPIC_DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoBaseUrl`] when the OpenAI dialect has no base
    /// URL, or [`ConfigError::Validation`] when the URL or key is unusable.
    pub fn for_dialect(dialect: Dialect, config: &ClientConfig) -> Result<Self, ClientError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty());

        match dialect {
            Dialect::OpenAi => {
                let base = base_url.ok_or(ConfigError::NoBaseUrl)?;
                Self::openai(base, config.api_key())
            }
            Dialect::Anthropic => {
                Self::anthropic(base_url.unwrap_or(ANTHROPIC_DEFAULT_BASE_URL), config.api_key())
            }
        }
    }

    /// `{base}/chat/completions` with bearer auth.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the URL or key is unusable.
    pub fn openai(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let mut headers = json_headers();
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {api_key}"))?);
        Ok(Self {
            dialect: Dialect::OpenAi,
            url: endpoint(base_url, "chat/completions")?,
            headers,
        })
    }

    /// `{base}/v1/messages` with `x-api-key` and `anthropic-version`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the URL or key is unusable.
    pub fn anthropic(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let mut headers = json_headers();
        headers.insert("x-api-key", header_value(api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_API_VERSION),
        );
        Ok(Self {
            dialect: Dialect::Anthropic,
            url: endpoint(base_url, "v1/messages")?,
            headers,
        })
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[must_use]
    pub fn url(&self) -> &url::Url {
        &self.url
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn header_value(value: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| {
        ConfigError::Validation("api key contains characters not allowed in a header".into())
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn endpoint(base_url: &str, path: &str) -> Result<url::Url, ClientError> {
    let raw = format!("{}/{path}", base_url.trim_end_matches('/'));
    url::Url::parse(&raw).map_err(|e| {
        ClientError::Config(ConfigError::Validation(format!(
            "endpoint '{raw}' is invalid: {e}"
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_endpoint_and_auth() {
        let config = ClientConfig::new()
            .with_api_key("sk-test")
            .with_base_url("https://api.example.com/v1/");
        let upstream = PreparedUpstream::for_dialect(Dialect::OpenAi, &config).unwrap();
        assert_eq!(
            upstream.url().as_str(),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(upstream.headers()[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(upstream.headers()[CONTENT_TYPE], "application/json");
        assert!(upstream.headers()[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn test_openai_requires_base_url() {
        let config = ClientConfig::new().with_api_key("sk-test");
        let err = PreparedUpstream::for_dialect(Dialect::OpenAi, &config).unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::NoBaseUrl)));
    }

    #[test]
    fn test_anthropic_default_base_url() {
        let config = ClientConfig::new().with_api_key("sk-ant");
        let upstream = PreparedUpstream::for_dialect(Dialect::Anthropic, &config).unwrap();
        assert_eq!(
            upstream.url().as_str(),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(upstream.headers()["x-api-key"], "sk-ant");
        assert_eq!(upstream.headers()["anthropic-version"], "2023-06-01");
        assert!(upstream.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_anthropic_custom_base_url() {
        let upstream = PreparedUpstream::anthropic("http://127.0.0.1:9000/", "k").unwrap();
        assert_eq!(upstream.url().as_str(), "http://127.0.0.1:9000/v1/messages");
        assert_eq!(upstream.dialect(), Dialect::Anthropic);
    }

    #[test]
    fn test_invalid_key_rejected() {
        let err = PreparedUpstream::openai("https://api.example.com", "bad\nkey").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Config(ConfigError::Validation(_))
        ));
    }
}
