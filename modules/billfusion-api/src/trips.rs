use billfusion_client::{BillFusionClient, ClientError, Method, Request};
use serde::Deserialize;

use crate::Page;

/// Trip lifecycle states as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Wire form used in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A single trip record.
#[derive(Debug, Clone, Deserialize)]
pub struct Trip {
    pub id: String,
    pub vendor_id: String,
    pub passenger_name: String,
    pub pickup_at: String,
    pub dropoff_at: Option<String>,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub status: TripStatus,
    pub distance_miles: f64,
    pub fare_cents: i64,
}

/// Filter for trip listings. Unset fields are omitted from the query string.
#[derive(Debug, Clone, Default)]
pub struct TripFilter {
    pub status: Option<TripStatus>,
    pub vendor_id: Option<String>,
    /// Inclusive lower bound on pickup time, ISO-8601.
    pub from: Option<String>,
    /// Inclusive upper bound on pickup time, ISO-8601.
    pub to: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Trip history endpoints.
pub struct TripsApi {
    client: BillFusionClient,
}

impl TripsApi {
    pub fn new(client: BillFusionClient) -> Self {
        Self { client }
    }

    /// List trips matching the filter.
    pub async fn list(&self, filter: &TripFilter) -> Result<Page<Trip>, ClientError> {
        let mut builder = Request::builder().method(Method::GET).path("/v1/trips");
        if let Some(status) = filter.status {
            builder = builder.query("status", status.as_str());
        }
        if let Some(vendor_id) = &filter.vendor_id {
            builder = builder.query("vendor_id", vendor_id);
        }
        if let Some(from) = &filter.from {
            builder = builder.query("from", from);
        }
        if let Some(to) = &filter.to {
            builder = builder.query("to", to);
        }
        if let Some(page) = filter.page {
            builder = builder.query("page", page);
        }
        if let Some(per_page) = filter.per_page {
            builder = builder.query("per_page", per_page);
        }
        let request = builder.build()?;
        self.client.execute(&request).await?.json().await
    }

    /// Fetch a single trip by id.
    pub async fn get(&self, id: &str) -> Result<Trip, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .path(format!("/v1/trips/{id}"))
            .build()?;
        self.client.execute(&request).await?.json().await
    }
}
