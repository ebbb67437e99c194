use billfusion_client::{BillFusionClient, ClientError, Method, Request, Response};
use serde::Deserialize;

/// Billing report lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Finalized,
    Invoiced,
}

/// Aggregated billing report for one client and period.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingReport {
    pub id: String,
    /// Billing period, `YYYY-MM`.
    pub period: String,
    pub client_id: String,
    pub trip_count: u64,
    pub total_cents: i64,
    pub status: ReportStatus,
    pub generated_at: String,
}

/// Billing report endpoints.
pub struct BillingApi {
    client: BillFusionClient,
}

impl BillingApi {
    pub fn new(client: BillFusionClient) -> Self {
        Self { client }
    }

    /// List reports, optionally restricted to one period (`YYYY-MM`).
    pub async fn reports(&self, period: Option<&str>) -> Result<Vec<BillingReport>, ClientError> {
        let mut builder = Request::builder()
            .method(Method::GET)
            .path("/v1/billing/reports");
        if let Some(period) = period {
            builder = builder.query("period", period);
        }
        let request = builder.build()?;
        self.client.execute(&request).await?.json().await
    }

    /// Fetch a single report by id.
    pub async fn report(&self, id: &str) -> Result<BillingReport, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .path(format!("/v1/billing/reports/{id}"))
            .build()?;
        self.client.execute(&request).await?.json().await
    }

    /// Download a report export (CSV).
    ///
    /// Returns the response itself so large exports can be consumed
    /// incrementally via [`Response::into_stream`].
    pub async fn export(&self, id: &str) -> Result<Response, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .path(format!("/v1/billing/reports/{id}/export"))
            .build()?;
        self.client.execute(&request).await
    }
}
