use billfusion_client::{BillFusionClient, ClientError, Method, Request};
use serde::Deserialize;

/// Payout settlement states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    Pending,
    Paid,
    Failed,
}

/// A vendor payout for one billing period.
#[derive(Debug, Clone, Deserialize)]
pub struct Payout {
    pub id: String,
    pub vendor_id: String,
    /// Billing period, `YYYY-MM`.
    pub period: String,
    pub amount_cents: i64,
    pub status: PayoutStatus,
    pub paid_at: Option<String>,
}

/// Vendor payout endpoints.
pub struct PayoutsApi {
    client: BillFusionClient,
}

impl PayoutsApi {
    pub fn new(client: BillFusionClient) -> Self {
        Self { client }
    }

    /// List payouts, optionally restricted to one vendor.
    pub async fn list(&self, vendor_id: Option<&str>) -> Result<Vec<Payout>, ClientError> {
        let mut builder = Request::builder().method(Method::GET).path("/v1/payouts");
        if let Some(vendor_id) = vendor_id {
            builder = builder.query("vendor_id", vendor_id);
        }
        let request = builder.build()?;
        self.client.execute(&request).await?.json().await
    }
}
