use std::time::Duration;

use bytes::{Bytes, BytesMut};

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::transport::prepared_upstream::PreparedUpstream;

/// Error bodies larger than this are truncated before decoding.
pub const MAX_ERROR_BODY_BYTES: usize = 1 << 20;

/// Build the shared reqwest client.
///
/// # Errors
///
/// Returns [`ClientError::Transport`] when the proxy URL is rejected or the
/// client cannot be constructed.
pub fn build_reqwest_client(
    pool_max_idle_per_host: usize,
    pool_idle_timeout: Option<Duration>,
    timeout: Duration,
    use_env_proxy: bool,
    proxy_url: Option<&str>,
) -> Result<reqwest::Client, ClientError> {
    let mut builder = reqwest::Client::builder()
        .pool_max_idle_per_host(pool_max_idle_per_host)
        .pool_idle_timeout(pool_idle_timeout)
        .tcp_nodelay(true)
        .connect_timeout(Duration::from_secs(5))
        .redirect(reqwest::redirect::Policy::none())
        .timeout(timeout);

    if let Some(proxy_url) = proxy_url {
        builder = builder.no_proxy().proxy(reqwest::Proxy::all(proxy_url)?);
    } else if !use_env_proxy {
        builder = builder.no_proxy();
    }

    Ok(builder.build()?)
}

/// Thin wrapper around a pooled reqwest client.
///
/// Sends are single-shot: a failed request is surfaced to the caller as-is.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport from client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = build_reqwest_client(
            config.pool_max_idle_per_host,
            Some(Duration::from_secs(config.pool_idle_timeout_secs)),
            Duration::from_secs(config.timeout_secs),
            config.use_env_proxy,
            config.proxy.as_deref(),
        )?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// POST a JSON body to the upstream endpoint.
    ///
    /// The response is returned regardless of status; callers inspect it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the request cannot be sent.
    pub async fn post_json(
        &self,
        upstream: &PreparedUpstream,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = reqwest::Request::new(http::Method::POST, upstream.url().clone());
        *request.headers_mut() = upstream.headers().clone();
        *request.body_mut() = Some(reqwest::Body::from(body));

        tracing::debug!(
            dialect = %upstream.dialect(),
            url = %upstream.url(),
            "sending upstream request"
        );
        Ok(self.client.execute(request).await?)
    }
}

/// Read a non-2xx response body, keeping at most [`MAX_ERROR_BODY_BYTES`].
async fn read_limited_body(mut response: reqwest::Response) -> Result<Bytes, reqwest::Error> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = response.chunk().await? {
        let room = MAX_ERROR_BODY_BYTES - buf.len();
        if chunk.len() >= room {
            buf.extend_from_slice(&chunk[..room]);
            break;
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Convert a non-2xx response into an [`ApiError`] using the dialect's
/// error-body decoder.
pub(crate) async fn api_error_from_response<F>(response: reqwest::Response, decode: F) -> ApiError
where
    F: FnOnce(u16, &[u8]) -> ApiError,
{
    let status = response.status().as_u16();
    match read_limited_body(response).await {
        Ok(body) => decode(status, &body),
        Err(err) => ApiError {
            status_code: status,
            message: "failed to read error response".to_string(),
            source: Some(Box::new(err)),
            ..ApiError::default()
        },
    }
}
