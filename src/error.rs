use std::fmt;

use crate::config::ConfigError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type returned by every client, translator and stream operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("send request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("read stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("marshal request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("protocol translation error: {0}")]
    Translation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("empty response from API")]
    EmptyResponse,
    #[error("stream is closed")]
    StreamClosed,
    #[error("stream line exceeds {limit} bytes")]
    LineTooLong { limit: usize },
}

impl ClientError {
    pub(crate) fn decode(context: &'static str, source: serde_json::Error) -> Self {
        ClientError::Decode { context, source }
    }

    /// Returns the vendor API error, if this is one.
    #[must_use]
    pub fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::convert::Infallible> for ClientError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Broad error category derived from the upstream HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidRequest,
    Authentication,
    Permission,
    RateLimit,
    ServerError,
    Unknown,
}

/// Map an upstream HTTP status code to an error category.
#[must_use]
pub fn category_from_upstream_status(status: u16) -> ErrorCategory {
    match status {
        400 => ErrorCategory::InvalidRequest,
        401 => ErrorCategory::Authentication,
        403 => ErrorCategory::Permission,
        429 => ErrorCategory::RateLimit,
        500..=599 => ErrorCategory::ServerError,
        _ => ErrorCategory::Unknown,
    }
}

/// Uniform vendor API error, regardless of which dialect produced it.
///
/// `status_code` is 0 when the error arrived inside an already-open stream.
#[derive(Debug, Default)]
pub struct ApiError {
    pub status_code: u16,
    pub code: String,
    pub message: String,
    pub error_type: String,
    pub source: Option<BoxError>,
}

impl ApiError {
    #[must_use]
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        category_from_upstream_status(self.status_code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API error (status {}): {} - {}",
            self.status_code, self.code, self.message
        )
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_category_from_status() {
        assert_eq!(category_from_upstream_status(400), ErrorCategory::InvalidRequest);
        assert_eq!(category_from_upstream_status(401), ErrorCategory::Authentication);
        assert_eq!(category_from_upstream_status(403), ErrorCategory::Permission);
        assert_eq!(category_from_upstream_status(429), ErrorCategory::RateLimit);
        assert_eq!(category_from_upstream_status(503), ErrorCategory::ServerError);
        assert_eq!(category_from_upstream_status(0), ErrorCategory::Unknown);
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError {
            status_code: 429,
            code: "rate_limit_exceeded".into(),
            message: "slow down".into(),
            error_type: "tokens".into(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "API error (status 429): rate_limit_exceeded - slow down"
        );
        assert_eq!(err.category(), ErrorCategory::RateLimit);
    }

    #[test]
    fn test_api_error_exposes_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated");
        let err = ApiError {
            source: Some(Box::new(cause)),
            ..ApiError::new(502, "failed to read error response")
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "truncated");
    }

    #[test]
    fn test_as_api_error() {
        let err = ClientError::from(ApiError::new(500, "boom"));
        assert_eq!(err.as_api_error().map(|e| e.status_code), Some(500));
        assert!(ClientError::EmptyResponse.as_api_error().is_none());
    }
}
