use std::pin::Pin;

use bytes::Bytes;
use futures::stream::Stream;
use serde::Serialize;

use crate::error::ClientError;

pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// Outbound request body.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// Empty body
    #[default]
    Empty,
    /// Buffered bytes
    Bytes(Bytes),
}

impl Body {
    /// Create an empty body
    pub fn empty() -> Self {
        Body::Empty
    }

    /// Create a body from bytes
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Body::Bytes(bytes.into())
    }

    /// Create a body from a JSON-serializable value.
    ///
    /// Serialization failure is an envelope-construction error and surfaces
    /// as [`ClientError::Build`], outside the classification path.
    pub fn from_json<T: Serialize>(value: &T) -> Result<Self, ClientError> {
        let json = serde_json::to_vec(value).map_err(|e| ClientError::Build(e.to_string()))?;
        Ok(Body::Bytes(Bytes::from(json)))
    }

    /// Check if body is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }
}

// Convenient From trait implementations
impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(Bytes::from(s))
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Bytes(Bytes::from(s.to_string()))
    }
}

impl From<Vec<u8>> for Body {
    fn from(v: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(v))
    }
}

impl From<Bytes> for Body {
    fn from(b: Bytes) -> Self {
        Body::Bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_is_empty() {
        assert!(Body::default().is_empty());
    }

    #[test]
    fn test_from_json_sets_bytes() {
        let body = Body::from_json(&json!({"a": 1})).unwrap();
        let Body::Bytes(bytes) = body else {
            panic!("expected buffered body");
        };
        assert_eq!(bytes.as_ref(), br#"{"a":1}"#);
    }

    #[test]
    fn test_from_conversions() {
        assert!(Body::from(()).is_empty());
        assert!(!Body::from("x").is_empty());
        assert!(!Body::from(vec![1u8, 2]).is_empty());
    }
}
