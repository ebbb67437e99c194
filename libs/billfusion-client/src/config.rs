use std::time::Duration;

use crate::error::ClientError;

/// Gateway configuration, read once at startup and passed into
/// [`crate::BillFusionClient::new`]. No module-wide singleton: tests inject
/// a fake base address the same way production injects the real one.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the BillFusion backend, without a trailing slash.
    pub base_url: String,
    /// Default per-request timeout.
    pub timeout: Duration,
    /// Emit structured diagnostic logs for every request and response.
    pub debug: bool,
}

impl ClientConfig {
    /// Create a configuration with the default 30 second timeout and
    /// diagnostics off.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            debug: false,
        }
    }

    /// Set the default per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Toggle diagnostic logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Expects:
    /// - `BILLFUSION_API_URL`: base address of the backend (required)
    /// - `BILLFUSION_TIMEOUT_SECS`: default timeout in seconds (default: 30)
    /// - `BILLFUSION_DEBUG`: "1", "true" or "yes" enables diagnostics
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("BILLFUSION_API_URL")
            .map_err(|_| ClientError::Build("BILLFUSION_API_URL not set".into()))?;

        let timeout_secs: u64 = match std::env::var("BILLFUSION_TIMEOUT_SECS") {
            Ok(val) => val.parse().map_err(|_| {
                ClientError::Build(format!(
                    "BILLFUSION_TIMEOUT_SECS must be a valid integer, got: '{val}'"
                ))
            })?,
            Err(_) => 30,
        };

        let debug = std::env::var("BILLFUSION_DEBUG")
            .map(|val| matches!(val.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            debug,
        })
    }
}
