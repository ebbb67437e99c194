use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

use crate::body::Body;
use crate::error::ClientError;

/// Outbound request envelope: method, path, query, headers, body.
///
/// Carries the per-instance marker for the one-shot re-authentication
/// policy: the first 401 observed for this instance triggers the credential
/// clear and redirect; any later 401 for the same instance is classified
/// without repeating the side effects. A rebuilt request starts fresh.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Body,
    timeout: Option<Duration>,
    auth_retried: AtomicBool,
}

impl Request {
    /// Create a new request builder
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the query parameters
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Get the request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Get the per-request timeout override
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Records an authentication failure for this instance; returns whether
    /// one had already been recorded.
    pub(crate) fn mark_auth_retried(&self) -> bool {
        self.auth_retried.swap(true, Ordering::SeqCst)
    }
}

/// Builder for constructing requests with a fluent API
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Body,
    timeout: Option<Duration>,
    build_error: Option<ClientError>,
}

impl RequestBuilder {
    /// Set the HTTP method
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Set the request path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Append a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Add a header. Invalid names or values surface at `build`.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: TryInto<HeaderName>,
        V: TryInto<HeaderValue>,
        K::Error: std::fmt::Display,
        V::Error: std::fmt::Display,
    {
        match (key.try_into(), value.try_into()) {
            (Ok(key), Ok(value)) => {
                self.headers.insert(key, value);
            }
            (Err(e), _) => {
                self.build_error
                    .get_or_insert(ClientError::Build(format!("Invalid header name: {e}")));
            }
            (_, Err(e)) => {
                self.build_error
                    .get_or_insert(ClientError::Build(format!("Invalid header value: {e}")));
            }
        }
        self
    }

    /// Set the body to a JSON-serialized value and add Content-Type header
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match Body::from_json(value) {
            Ok(body) => {
                self.body = body;
                self.headers.insert(
                    http::header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                );
            }
            Err(e) => {
                self.build_error.get_or_insert(e);
            }
        }
        self
    }

    /// Set the request body
    pub fn body<B: Into<Body>>(mut self, body: B) -> Self {
        self.body = body.into();
        self
    }

    /// Set a per-request timeout overriding the client default
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the request
    pub fn build(self) -> Result<Request, ClientError> {
        if let Some(err) = self.build_error {
            return Err(err);
        }
        let method = self.method.unwrap_or(Method::GET);
        let path = self
            .path
            .ok_or_else(|| ClientError::Build("Request path is required".into()))?;

        Ok(Request {
            method,
            path,
            query: self.query,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout,
            auth_retried: AtomicBool::new(false),
        })
    }
}
