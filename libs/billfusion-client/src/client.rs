use std::sync::Arc;

use futures::TryStreamExt;
use http::header::{AUTHORIZATION, RETRY_AFTER};
use http::{HeaderValue, StatusCode};
use tracing::{debug, warn};

use crate::auth::{CredentialStore, Navigator};
use crate::body::Body;
use crate::config::ClientConfig;
use crate::correlation::CorrelationId;
use crate::error::{ApiError, ClientError};
use crate::request::Request;
use crate::response::Response;

/// Trace header carrying the per-call correlation identifier.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Gateway for all outbound calls to the BillFusion backend.
///
/// Constructed once at startup from [`ClientConfig`]; all calls issued
/// thereafter share the configuration. Cheap to clone: the underlying
/// connection pool and the injected collaborators are shared.
#[derive(Clone)]
pub struct BillFusionClient {
    http_client: reqwest::Client,
    base_url: String,
    debug: bool,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl BillFusionClient {
    /// Create a gateway from configuration and the injected credential
    /// store and navigation surface.
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            debug: config.debug,
            credentials,
            navigator,
        })
    }

    /// Execute a request against the backend.
    ///
    /// Resolves with the response body unmodified, or rejects with a
    /// classified error, never a raw transport failure. Envelope assembly
    /// problems reject as [`ClientError::Build`] without classification.
    ///
    /// The request is taken by reference so the caller may re-issue the
    /// same instance; the one-shot re-authentication marker travels with it.
    pub async fn execute(&self, request: &Request) -> Result<Response, ClientError> {
        let correlation_id = CorrelationId::new();
        let url = format!("{}{}", self.base_url, request.path());

        let mut req_builder = self
            .http_client
            .request(request.method().clone(), &url)
            .header(CORRELATION_HEADER, correlation_id.to_string());

        if !request.query().is_empty() {
            req_builder = req_builder.query(request.query());
        }

        // No token is not an error: the request transmits unauthenticated
        // and the backend rejects it if the endpoint requires a session.
        let token = self.credentials.current_token();
        let authenticated = token.is_some();
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ClientError::Build(format!("invalid access token: {e}")))?;
            req_builder = req_builder.header(AUTHORIZATION, value);
        }

        for (name, value) in request.headers() {
            req_builder = req_builder.header(name, value);
        }

        if let Some(timeout) = request.timeout() {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = match request.body() {
            Body::Empty => req_builder,
            Body::Bytes(bytes) => req_builder.body(bytes.clone()),
        };

        if self.debug {
            debug!(
                method = %request.method(),
                path = request.path(),
                correlation_id = %correlation_id,
                authenticated,
                "sending request"
            );
        }

        let resp = match req_builder.send().await {
            Ok(resp) => resp,
            Err(err) => {
                if self.debug {
                    debug!(
                        path = request.path(),
                        correlation_id = %correlation_id,
                        error = %err,
                        "transport failure"
                    );
                }
                return Err(ClientError::Api(ApiError::from_transport(err)));
            }
        };

        let status = resp.status();
        if status.is_success() {
            if self.debug {
                debug!(
                    status = status.as_u16(),
                    path = request.path(),
                    correlation_id = %correlation_id,
                    "request succeeded"
                );
            }
            let headers = resp.headers().clone();
            let stream = resp
                .bytes_stream()
                .map_err(|e| ClientError::Api(ApiError::from_transport(e)));
            return Ok(Response::new(
                status,
                headers,
                correlation_id,
                Box::pin(stream),
            ));
        }

        Err(self.classify_failure(resp, request, correlation_id).await)
    }

    /// Classify a failed response, applying the one-shot
    /// credential-clear/redirect policy for the first 401 observed on this
    /// request instance. The redirect never re-issues the request.
    async fn classify_failure(
        &self,
        resp: reqwest::Response,
        request: &Request,
        correlation_id: CorrelationId,
    ) -> ClientError {
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = resp.bytes().await.unwrap_or_default();
        let error = ApiError::from_status(status, retry_after, &body);

        if status == StatusCode::UNAUTHORIZED && !request.mark_auth_retried() {
            warn!(
                path = request.path(),
                correlation_id = %correlation_id,
                "session expired, clearing credentials and redirecting to login"
            );
            self.credentials.clear();
            self.navigator.redirect_to_login();
        } else if self.debug {
            debug!(
                status = status.as_u16(),
                path = request.path(),
                correlation_id = %correlation_id,
                kind = %error.kind,
                "request failed"
            );
        }

        ClientError::Api(error)
    }
}
