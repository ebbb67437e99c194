//! BillFusion HTTP Client Gateway
//!
//! Single chokepoint for outbound calls to the BillFusion backend. Every
//! request issued through [`BillFusionClient`] gets the cross-cutting
//! concerns the rest of the dashboard relies on:
//!
//! - a per-call correlation identifier attached as a trace header
//! - bearer authentication read from an injected [`CredentialStore`]
//! - structured diagnostic logging (opt-in via configuration)
//! - classification of every failure into a fixed [`ErrorKind`] taxonomy
//! - a one-shot credential-clear/redirect policy on session expiry
//!
//! Callers never see raw transport errors; a call either resolves with the
//! response body or rejects with a classified [`ApiError`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use billfusion_client::{
//!     BillFusionClient, ClientConfig, MemoryCredentialStore, Method, NoopNavigator, Request,
//! };
//!
//! # async fn example() -> Result<(), billfusion_client::ClientError> {
//! let config = ClientConfig::new("https://api.billfusion.example").with_debug(true);
//! let credentials = Arc::new(MemoryCredentialStore::with_token("access-token"));
//! let client = BillFusionClient::new(config, credentials, Arc::new(NoopNavigator))?;
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .path("/v1/trips")
//!     .query("status", "completed")
//!     .build()?;
//!
//! let response = client.execute(&request).await?;
//! let trips: serde_json::Value = response.json().await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod body;
mod client;
mod config;
mod correlation;
mod error;
mod request;
mod response;

// Re-export public API
pub use auth::{CredentialStore, MemoryCredentialStore, Navigator, NoopNavigator};
pub use body::{Body, BoxStream};
pub use client::{BillFusionClient, CORRELATION_HEADER};
pub use config::ClientConfig;
pub use correlation::CorrelationId;
pub use error::{ApiError, ClientError, ErrorKind};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export commonly used types from dependencies
pub use http::{Method, StatusCode};
