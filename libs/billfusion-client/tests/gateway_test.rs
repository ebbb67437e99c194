use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use httpmock::prelude::*;
use serde_json::json;

use billfusion_client::{
    ApiError, BillFusionClient, ClientConfig, ClientError, CredentialStore, ErrorKind,
    MemoryCredentialStore, Method, Navigator, Request,
};

/// Navigator that counts redirect invocations.
#[derive(Default)]
struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

/// Credential store that counts clear invocations.
struct CountingStore {
    inner: MemoryCredentialStore,
    clears: AtomicUsize,
}

impl CountingStore {
    fn with_token(token: &str) -> Self {
        Self {
            inner: MemoryCredentialStore::with_token(token),
            clears: AtomicUsize::new(0),
        }
    }

    fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl CredentialStore for CountingStore {
    fn current_token(&self) -> Option<String> {
        self.inner.current_token()
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear();
    }
}

fn client_with(
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
) -> BillFusionClient {
    BillFusionClient::new(ClientConfig::new(base_url), credentials, navigator).unwrap()
}

fn client_for(server: &MockServer) -> BillFusionClient {
    client_with(
        server.base_url(),
        Arc::new(MemoryCredentialStore::with_token("sekret-token")),
        Arc::new(RecordingNavigator::default()),
    )
}

fn get(path: &str) -> Request {
    Request::builder().method(Method::GET).path(path).build().unwrap()
}

fn classified(err: ClientError) -> ApiError {
    match err {
        ClientError::Api(err) => err,
        other => panic!("expected classified error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_attaches_bearer_and_correlation_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/ping")
            .header("authorization", "Bearer sekret-token")
            .header_exists("x-correlation-id");
        then.status(200).json_body(json!({"ok": true}));
    });

    let client = client_for(&server);
    let response = client.execute(&get("/v1/ping")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    mock.assert();
}

#[tokio::test]
async fn test_request_without_token_omits_authorization_header() {
    let server = MockServer::start();
    // Any request carrying an Authorization header lands on this mock.
    let authed = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/public")
            .header_exists("authorization");
        then.status(500);
    });
    let open = server.mock(|when, then| {
        when.method(GET).path("/v1/public");
        then.status(200).body("ok");
    });

    let client = client_with(
        server.base_url(),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(RecordingNavigator::default()),
    );
    let response = client.execute(&get("/v1/public")).await.unwrap();

    assert_eq!(response.text().await.unwrap(), "ok");
    assert_eq!(authed.hits(), 0);
    assert_eq!(open.hits(), 1);
}

#[tokio::test]
async fn test_success_returns_body_unmodified() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/blob");
        then.status(200).body(vec![0x01, 0x02, 0x03, 0x04]);
    });

    let client = client_for(&server);
    let response = client.execute(&get("/v1/blob")).await.unwrap();

    assert_eq!(
        response.bytes().await.unwrap(),
        Bytes::from(vec![0x01, 0x02, 0x03, 0x04])
    );
}

#[tokio::test]
async fn test_expired_session_clears_credentials_and_redirects() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(401).json_body(json!({"message": "Token expired"}));
    });

    let store = Arc::new(CountingStore::with_token("stale-token"));
    let navigator = Arc::new(RecordingNavigator::default());
    let client = client_with(server.base_url(), store.clone(), navigator.clone());

    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Authentication);
    assert_eq!(error.message, "Token expired");
    assert!(!error.retryable);
    assert_eq!(store.current_token(), None);
    assert_eq!(store.clears(), 1);
    assert_eq!(navigator.redirects(), 1);
}

#[tokio::test]
async fn test_second_401_for_same_request_does_not_repeat_side_effects() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(401);
    });

    let store = Arc::new(CountingStore::with_token("stale-token"));
    let navigator = Arc::new(RecordingNavigator::default());
    let client = client_with(server.base_url(), store.clone(), navigator.clone());

    // Re-issue the same request instance after the first failure.
    let request = get("/v1/trips");
    let first = classified(client.execute(&request).await.unwrap_err());
    let second = classified(client.execute(&request).await.unwrap_err());

    assert_eq!(first.kind, ErrorKind::Authentication);
    assert_eq!(second.kind, ErrorKind::Authentication);
    assert_eq!(store.clears(), 1);
    assert_eq!(navigator.redirects(), 1);
}

#[tokio::test]
async fn test_rebuilt_request_gets_a_fresh_retry_marker() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(401);
    });

    let store = Arc::new(CountingStore::with_token("stale-token"));
    let navigator = Arc::new(RecordingNavigator::default());
    let client = client_with(server.base_url(), store.clone(), navigator.clone());

    let _ = client.execute(&get("/v1/trips")).await.unwrap_err();
    let _ = client.execute(&get("/v1/trips")).await.unwrap_err();

    assert_eq!(store.clears(), 2);
    assert_eq!(navigator.redirects(), 2);
}

#[tokio::test]
async fn test_validation_error_carries_field_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/vendors");
        then.status(422).json_body(json!({
            "message": "Validation failed",
            "errors": {
                "email": ["already taken"],
                "name": ["required"]
            }
        }));
    });

    let client = client_for(&server);
    let request = Request::builder()
        .method(Method::POST)
        .path("/v1/vendors")
        .json(&json!({"email": "dup@example.com"}))
        .build()
        .unwrap();
    let error = classified(client.execute(&request).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Validation);
    assert!(!error.retryable);
    let errors = error.errors.unwrap();
    assert_eq!(errors["email"], vec!["already taken"]);
    assert_eq!(errors["name"], vec!["required"]);
}

#[tokio::test]
async fn test_validation_error_with_empty_body_yields_empty_map() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(400);
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Validation);
    assert_eq!(error.message, "Validation failed");
    assert_eq!(error.errors, Some(Default::default()));
}

#[tokio::test]
async fn test_rate_limit_exposes_retry_after() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(429).header("retry-after", "17");
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::RateLimit);
    assert!(error.retryable);
    assert_eq!(error.retry_after, Some(17));
}

#[tokio::test]
async fn test_rate_limit_without_header_has_no_retry_after() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(429);
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::RateLimit);
    assert_eq!(error.retry_after, None);
}

#[tokio::test]
async fn test_server_error_prefers_body_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(500).json_body(json!({"message": "db down"}));
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Server);
    assert_eq!(error.message, "db down");
    assert!(error.retryable);
}

#[tokio::test]
async fn test_forbidden_with_empty_body_uses_default_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/admin/payouts");
        then.status(403);
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/admin/payouts")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Authorization);
    assert_eq!(error.message, "Access denied");
    assert!(!error.retryable);
}

#[tokio::test]
async fn test_unrecognized_status_maps_to_unknown() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/trips");
        then.status(418);
    });

    let client = client_for(&server);
    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Unknown);
    assert!(!error.retryable);
}

#[tokio::test]
async fn test_connection_failure_classifies_as_network() {
    let navigator = Arc::new(RecordingNavigator::default());
    let client = client_with(
        // Nothing listens here; connections are refused.
        "http://127.0.0.1:9".to_string(),
        Arc::new(MemoryCredentialStore::with_token("sekret-token")),
        navigator.clone(),
    );

    let error = classified(client.execute(&get("/v1/trips")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Network);
    assert!(error.retryable);
    assert_eq!(error.status, None);
    assert!(error.source_error().is_some());
    assert_eq!(navigator.redirects(), 0);
}

#[tokio::test]
async fn test_timeout_classifies_as_network() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/slow");
        then.status(200).delay(Duration::from_millis(500));
    });

    let client = BillFusionClient::new(
        ClientConfig::new(server.base_url()).with_timeout(Duration::from_millis(50)),
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(RecordingNavigator::default()),
    )
    .unwrap();

    let error = classified(client.execute(&get("/v1/slow")).await.unwrap_err());

    assert_eq!(error.kind, ErrorKind::Network);
    assert!(error.retryable);
}

#[tokio::test]
async fn test_per_request_timeout_overrides_client_default() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/slow");
        then.status(200).delay(Duration::from_millis(500));
    });

    let client = client_for(&server);
    let request = Request::builder()
        .method(Method::GET)
        .path("/v1/slow")
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let error = classified(client.execute(&request).await.unwrap_err());
    assert_eq!(error.kind, ErrorKind::Network);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/trips")
            .header_exists("x-correlation-id");
        then.status(200).json_body(json!({"data": []}));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/payouts")
            .header_exists("x-correlation-id");
        then.status(200).json_body(json!({"data": []}));
    });

    let client = client_for(&server);
    let trips_request = get("/v1/trips");
    let payouts_request = get("/v1/payouts");
    let (a, b) = tokio::join!(
        client.execute(&trips_request),
        client.execute(&payouts_request)
    );

    assert!(a.is_ok());
    assert!(b.is_ok());
    first.assert();
    second.assert();
}

#[tokio::test]
async fn test_query_parameters_are_transmitted() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/trips")
            .query_param("status", "completed")
            .query_param("page", "2");
        then.status(200).json_body(json!({"data": []}));
    });

    let client = client_for(&server);
    let request = Request::builder()
        .method(Method::GET)
        .path("/v1/trips")
        .query("status", "completed")
        .query("page", 2)
        .build()
        .unwrap();

    client.execute(&request).await.unwrap();
    mock.assert();
}
