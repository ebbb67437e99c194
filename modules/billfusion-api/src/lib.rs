//! Typed façades over the BillFusion HTTP gateway.
//!
//! Each façade owns one backend domain: it builds endpoint paths and query
//! strings, issues requests through
//! [`BillFusionClient`](billfusion_client::BillFusionClient), and
//! deserializes the snake_case wire payloads into typed models. All
//! cross-cutting behavior (authentication, tracing, error classification,
//! the session-expiry redirect) comes from the gateway; the façades stay
//! thin.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use billfusion_api::{TripFilter, TripsApi};
//! use billfusion_client::{
//!     BillFusionClient, ClientConfig, MemoryCredentialStore, NoopNavigator,
//! };
//!
//! # async fn example() -> Result<(), billfusion_client::ClientError> {
//! let client = BillFusionClient::new(
//!     ClientConfig::new("https://api.billfusion.example"),
//!     Arc::new(MemoryCredentialStore::with_token("access-token")),
//!     Arc::new(NoopNavigator),
//! )?;
//!
//! let trips = TripsApi::new(client);
//! let page = trips.list(&TripFilter::default()).await?;
//! # Ok(())
//! # }
//! ```

mod billing;
mod fleet;
mod payouts;
mod trips;

pub use billing::{BillingApi, BillingReport, ReportStatus};
pub use fleet::{FleetApi, Vehicle};
pub use payouts::{Payout, PayoutStatus, PayoutsApi};
pub use trips::{Trip, TripFilter, TripStatus, TripsApi};

use serde::Deserialize;

/// Paginated listing envelope returned by collection endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}
