use std::time::Instant;

use crate::config::validation::validate_config;
use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, ClientError};
use crate::observability::log_request_complete;
use crate::protocol::anthropic::decode_anthropic_error_body;
use crate::protocol::anthropic::encoder::encode_anthropic_request;
use crate::protocol::anthropic::response_decoder::decode_anthropic_response;
use crate::protocol::canonical::{ChatRequest, ChatResponse, Dialect};
use crate::protocol::openai_chat::decode_openai_error_body;
use crate::protocol::openai_chat::encoder::encode_openai_chat_request;
use crate::protocol::openai_chat::response_decoder::decode_openai_chat_response;
use crate::stream::ChatStream;
use crate::transport::{api_error_from_response, HttpTransport, PreparedUpstream};

/// Chat-completion client speaking both vendor dialects.
///
/// Requests are taken by reference and never mutated; the `stream` flag is
/// set per call.
#[derive(Debug, Clone)]
pub struct Client {
    transport: HttpTransport,
    // `None` when no base URL is configured; OpenAI calls then fail.
    openai: Option<PreparedUpstream>,
    anthropic: PreparedUpstream,
}

impl Client {
    /// Create a client from a validated configuration.
    ///
    /// An API key or base URL left unset is read from `AI_*` or `OPENAI_*`
    /// environment variables first; explicit values always win.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the configuration is invalid, or
    /// [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_env_lookup(config, |name| std::env::var(name).ok())
    }

    fn with_env_lookup<F>(config: ClientConfig, lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = config.with_env_lookup(lookup);
        validate_config(&config)?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(&config, transport)
    }

    /// Create a client that sends through a caller-provided reqwest client.
    ///
    /// Timeout, pool and proxy settings in `config` are ignored. Environment
    /// fallback applies as in [`Client::new`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the configuration is invalid.
    pub fn with_http_client(
        config: ClientConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, ClientError> {
        let config = config.with_env_fallback();
        validate_config(&config)?;
        Self::with_transport(&config, HttpTransport::with_client(http_client))
    }

    fn with_transport(
        config: &ClientConfig,
        transport: HttpTransport,
    ) -> Result<Self, ClientError> {
        let openai = match PreparedUpstream::for_dialect(Dialect::OpenAi, config) {
            Ok(upstream) => Some(upstream),
            Err(ClientError::Config(ConfigError::NoBaseUrl)) => None,
            Err(err) => return Err(err),
        };
        let anthropic = PreparedUpstream::for_dialect(Dialect::Anthropic, config)?;
        Ok(Self {
            transport,
            openai,
            anthropic,
        })
    }

    fn upstream(&self, dialect: Dialect) -> Result<&PreparedUpstream, ClientError> {
        match dialect {
            Dialect::OpenAi => self
                .openai
                .as_ref()
                .ok_or(ClientError::Config(ConfigError::NoBaseUrl)),
            Dialect::Anthropic => Ok(&self.anthropic),
        }
    }

    /// Non-streaming OpenAI chat completion.
    ///
    /// # Errors
    ///
    /// See [`Client::complete`].
    pub async fn chat_completion(&self, req: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.complete(Dialect::OpenAi, req).await
    }

    /// Streaming OpenAI chat completion.
    ///
    /// # Errors
    ///
    /// See [`Client::stream`].
    pub async fn chat_completion_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<ChatStream, ClientError> {
        self.stream(Dialect::OpenAi, req).await
    }

    /// Non-streaming Anthropic Messages call.
    ///
    /// # Errors
    ///
    /// See [`Client::complete`].
    pub async fn anthropic_chat_completion(
        &self,
        req: &ChatRequest,
    ) -> Result<ChatResponse, ClientError> {
        self.complete(Dialect::Anthropic, req).await
    }

    /// Streaming Anthropic Messages call.
    ///
    /// # Errors
    ///
    /// See [`Client::stream`].
    pub async fn anthropic_chat_completion_stream(
        &self,
        req: &ChatRequest,
    ) -> Result<ChatStream, ClientError> {
        self.stream(Dialect::Anthropic, req).await
    }

    /// Send a non-streaming request in `dialect` and normalize the reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] for non-2xx responses and embedded vendor
    /// errors, [`ClientError::EmptyResponse`] when no choice came back, and
    /// encode, decode, transport or configuration errors otherwise.
    pub async fn complete(
        &self,
        dialect: Dialect,
        req: &ChatRequest,
    ) -> Result<ChatResponse, ClientError> {
        let upstream = self.upstream(dialect)?;
        let body = encode_request(dialect, req, false)?;
        let started = Instant::now();

        tracing::debug!(
            dialect = %dialect,
            model = %req.model,
            stream = false,
            "dispatching chat request"
        );
        let response = self.transport.post_json(upstream, body).await?;
        if !response.status().is_success() {
            return Err(error_response(dialect, response).await);
        }

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let result = match dialect {
            Dialect::OpenAi => decode_openai_chat_response(status, &bytes),
            Dialect::Anthropic => decode_anthropic_response(&bytes),
        };
        let resp = result.inspect_err(|err| {
            if let Some(api) = err.as_api_error() {
                warn_api_error(dialect, api);
            }
        })?;

        log_request_complete(&resp.model, &resp.usage, started.elapsed());
        Ok(resp)
    }

    /// Open a streaming request in `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when the vendor rejects the request, and
    /// encode, transport or configuration errors otherwise. Errors after the
    /// stream opened surface from [`ChatStream::recv`].
    pub async fn stream(
        &self,
        dialect: Dialect,
        req: &ChatRequest,
    ) -> Result<ChatStream, ClientError> {
        let upstream = self.upstream(dialect)?;
        let body = encode_request(dialect, req, true)?;

        tracing::debug!(
            dialect = %dialect,
            model = %req.model,
            stream = true,
            "dispatching chat request"
        );
        let response = self.transport.post_json(upstream, body).await?;
        if !response.status().is_success() {
            return Err(error_response(dialect, response).await);
        }
        Ok(ChatStream::from_response(dialect, response))
    }
}

fn encode_request(
    dialect: Dialect,
    req: &ChatRequest,
    stream: bool,
) -> Result<Vec<u8>, ClientError> {
    match dialect {
        Dialect::OpenAi => encode_openai_chat_request(req, stream),
        Dialect::Anthropic => encode_anthropic_request(req, stream),
    }
}

async fn error_response(dialect: Dialect, response: reqwest::Response) -> ClientError {
    let err = match dialect {
        Dialect::OpenAi => api_error_from_response(response, decode_openai_error_body).await,
        Dialect::Anthropic => api_error_from_response(response, decode_anthropic_error_body).await,
    };
    warn_api_error(dialect, &err);
    ClientError::Api(err)
}

fn warn_api_error(dialect: Dialect, err: &ApiError) {
    tracing::warn!(
        dialect = %dialect,
        status = err.status_code,
        error_type = %err.error_type,
        code = %err.code,
        "upstream API error: {}",
        err.message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_new_requires_api_key() {
        let err = Client::with_env_lookup(ClientConfig::new(), no_env).unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::NoApiKey)));
    }

    #[test]
    fn test_env_fills_missing_key_and_base_url() {
        let env = |name: &str| match name {
            "OPENAI_API_KEY" => Some("sk-env".to_string()),
            "AI_BASE_URL" => Some("http://127.0.0.1:9/v1/".to_string()),
            _ => None,
        };
        let client = Client::with_env_lookup(ClientConfig::new(), env).unwrap();
        let upstream = client.upstream(Dialect::OpenAi).unwrap();
        assert_eq!(
            upstream.url().as_str(),
            "http://127.0.0.1:9/v1/chat/completions"
        );
        assert_eq!(upstream.headers()[http::header::AUTHORIZATION], "Bearer sk-env");
    }

    #[test]
    fn test_explicit_key_beats_env() {
        let env = |name: &str| (name == "AI_API_KEY").then(|| "sk-env".to_string());
        let config = ClientConfig::new()
            .with_api_key("sk-explicit")
            .with_base_url("http://127.0.0.1:9");
        let client = Client::with_env_lookup(config, env).unwrap();
        let upstream = client.upstream(Dialect::OpenAi).unwrap();
        assert_eq!(
            upstream.headers()[http::header::AUTHORIZATION],
            "Bearer sk-explicit"
        );
    }

    #[tokio::test]
    async fn test_openai_call_without_base_url_fails() {
        let config = ClientConfig::new().with_api_key("sk-test");
        let client = Client::with_env_lookup(config, no_env).unwrap();
        let req = ChatRequest::new("gpt-4o", vec![]);
        let err = client.chat_completion(&req).await.unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::NoBaseUrl)));
        let err = client.chat_completion_stream(&req).await.unwrap_err();
        assert!(matches!(err, ClientError::Config(ConfigError::NoBaseUrl)));
    }

    #[test]
    fn test_anthropic_defaults_without_base_url() {
        let config = ClientConfig::new().with_api_key("sk-ant");
        let client = Client::with_env_lookup(config, no_env).unwrap();
        let upstream = client.upstream(Dialect::Anthropic).unwrap();
        assert_eq!(
            upstream.url().as_str(),
            "https://api.anthropic.com/v1/messages"
        );
    }
}
