use bytes::Bytes;
use futures::StreamExt;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::body::BoxStream;
use crate::correlation::CorrelationId;
use crate::error::ClientError;

/// Successful response, returned with the body unmodified.
///
/// The body can be consumed buffered (`bytes`, `text`, `json`) or
/// incrementally (`into_stream`) for large payloads such as report exports.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    correlation_id: CorrelationId,
    body: ResponseBody,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("correlation_id", &self.correlation_id)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .finish()
    }
}

enum ResponseBody {
    Buffered(Bytes),
    Streaming(BoxStream<Result<Bytes, ClientError>>),
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Buffered(bytes) => f
                .debug_tuple("ResponseBody::Buffered")
                .field(&bytes.len())
                .finish(),
            ResponseBody::Streaming(_) => write!(f, "ResponseBody::Streaming(..)"),
        }
    }
}

impl Response {
    /// Create a streaming response from components
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        correlation_id: CorrelationId,
        stream: BoxStream<Result<Bytes, ClientError>>,
    ) -> Self {
        Self {
            status,
            headers,
            correlation_id,
            body: ResponseBody::Streaming(stream),
        }
    }

    /// Create a response from buffered bytes
    pub fn from_bytes(
        status: StatusCode,
        headers: HeaderMap,
        correlation_id: CorrelationId,
        bytes: Bytes,
    ) -> Self {
        Self {
            status,
            headers,
            correlation_id,
            body: ResponseBody::Buffered(bytes),
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The correlation identifier the request was sent with
    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }

    /// Consume the response and return the entire body as bytes
    pub async fn bytes(self) -> Result<Bytes, ClientError> {
        match self.body {
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Streaming(mut stream) => {
                let mut buf = Vec::new();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk?;
                    buf.extend_from_slice(&chunk);
                }
                Ok(Bytes::from(buf))
            }
        }
    }

    /// Consume the response and deserialize as JSON
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, ClientError> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Consume the response and return the body as a string
    pub async fn text(self) -> Result<String, ClientError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ClientError::Decode(format!("Invalid UTF-8: {e}")))
    }

    /// Convert the response into a byte stream for incremental consumption
    pub fn into_stream(self) -> BoxStream<Result<Bytes, ClientError>> {
        match self.body {
            ResponseBody::Buffered(bytes) => {
                Box::pin(futures::stream::once(async move { Ok(bytes) }))
            }
            ResponseBody::Streaming(stream) => stream,
        }
    }
}
