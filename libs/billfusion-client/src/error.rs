use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failure taxonomy for classified errors.
///
/// Closed set; any status the table does not recognize falls back to
/// `Unknown`. Classification happens once, at the gateway boundary, and is
/// never revised downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received (timeout, DNS failure, connection reset).
    Network,
    /// 400 or 422; carries field-level errors when the body provides them.
    Validation,
    /// 401; the session credential was missing or expired.
    Authentication,
    /// 403; the authenticated principal lacks access.
    Authorization,
    /// 409; the request conflicts with current server state.
    Conflict,
    /// 429; carries the Retry-After delay when the response provides it.
    RateLimit,
    /// 500, 502 or 503.
    Server,
    /// Any other status.
    Unknown,
}

impl ErrorKind {
    /// Maps a response status to its kind.
    pub fn classify(status: StatusCode) -> Self {
        match status.as_u16() {
            400 | 422 => Self::Validation,
            401 => Self::Authentication,
            403 => Self::Authorization,
            409 => Self::Conflict,
            429 => Self::RateLimit,
            500 | 502 | 503 => Self::Server,
            _ => Self::Unknown,
        }
    }

    /// Whether a caller retry may succeed. The gateway itself never retries;
    /// this is a hint for the view layer.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::RateLimit | Self::Server)
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::Network => "Network error",
            Self::Validation => "Validation failed",
            Self::Authentication => "Authentication required",
            Self::Authorization => "Access denied",
            Self::Conflict => "Conflict detected",
            Self::RateLimit => "Too many requests",
            Self::Server => "Server error",
            Self::Unknown => "Unexpected error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Authorization => "authorization",
            Self::Conflict => "conflict",
            Self::RateLimit => "rate_limit",
            Self::Server => "server",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classified failure returned for every unsuccessful call.
///
/// Equality covers the classified fields only; the embedded raw transport
/// error is diagnostic and excluded, so classifying the same outcome twice
/// yields equal values.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    /// Human-readable summary; prefers the response body's `message` field,
    /// falling back to a fixed phrase per kind.
    pub message: String,
    pub retryable: bool,
    /// Field-level validation detail. `Some` exactly for `Validation`
    /// failures; empty when the body carried no error map.
    pub errors: Option<BTreeMap<String, Vec<String>>>,
    /// Retry delay in seconds. `Some` only for `RateLimit` failures whose
    /// response carried a delta-seconds Retry-After header.
    pub retry_after: Option<u64>,
    /// Response status, when a response was received at all.
    pub status: Option<StatusCode>,
    #[source]
    source: Option<Arc<reqwest::Error>>,
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.message == other.message
            && self.retryable == other.retryable
            && self.errors == other.errors
            && self.retry_after == other.retry_after
            && self.status == other.status
    }
}

impl ApiError {
    /// Classifies a received response. Total: any body, including an empty
    /// or non-JSON one, produces a classification.
    pub fn from_status(status: StatusCode, retry_after: Option<u64>, body: &[u8]) -> Self {
        let kind = ErrorKind::classify(status);
        let parsed = ErrorBody::parse(body);
        let message = parsed
            .message
            .unwrap_or_else(|| kind.default_message().to_string());
        let errors = (kind == ErrorKind::Validation).then(|| parsed.errors.unwrap_or_default());
        let retry_after = if kind == ErrorKind::RateLimit {
            retry_after
        } else {
            None
        };
        Self {
            kind,
            message,
            retryable: kind.is_retryable(),
            errors,
            retry_after,
            status: Some(status),
            source: None,
        }
    }

    /// Classifies a transport failure where no response was received.
    pub fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Request timed out"
        } else if err.is_connect() {
            "Connection failed"
        } else {
            ErrorKind::Network.default_message()
        };
        Self {
            kind: ErrorKind::Network,
            message: message.to_string(),
            retryable: true,
            errors: None,
            retry_after: None,
            status: None,
            source: Some(Arc::new(err)),
        }
    }

    /// The originating transport error, for diagnostics.
    pub fn source_error(&self) -> Option<&reqwest::Error> {
        self.source.as_deref()
    }
}

/// Error payload shape probed out of a failure response body.
///
/// Tolerant by construction: `errors` values may arrive as arrays of
/// strings or as bare strings, and a malformed body degrades to defaults
/// rather than failing classification.
#[derive(Debug, Default)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorBody {
    fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);
        let errors = value.get("errors").and_then(Value::as_object).map(|map| {
            map.iter()
                .map(|(field, detail)| {
                    let messages = match detail {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                        Value::String(s) => vec![s.clone()],
                        other => vec![other.to_string()],
                    };
                    (field.clone(), messages)
                })
                .collect()
        });
        Self { message, errors }
    }
}

/// Error surface of the client library.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Envelope construction failed before transmission; never classified.
    #[error("request build error: {0}")]
    Build(String),

    /// A payload could not be deserialized into the expected shape.
    #[error("response decode error: {0}")]
    Decode(String),

    /// The call failed and was classified at the gateway boundary.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ClientError {
    /// The classified form, when this is a gateway failure.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            Self::Build(_) | Self::Decode(_) => None,
        }
    }
}
