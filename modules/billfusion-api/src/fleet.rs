use billfusion_client::{BillFusionClient, ClientError, Method, Request};
use serde::Deserialize;

/// A vehicle in a vendor's fleet.
#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub vendor_id: String,
    pub make: String,
    pub model: String,
    pub year: u16,
    pub plate_number: String,
    pub capacity: u8,
    pub active: bool,
}

/// Fleet endpoints.
pub struct FleetApi {
    client: BillFusionClient,
}

impl FleetApi {
    pub fn new(client: BillFusionClient) -> Self {
        Self { client }
    }

    /// List all vehicles visible to the current role.
    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .path("/v1/fleet/vehicles")
            .build()?;
        self.client.execute(&request).await?.json().await
    }

    /// Fetch a single vehicle by id.
    pub async fn vehicle(&self, id: &str) -> Result<Vehicle, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .path(format!("/v1/fleet/vehicles/{id}"))
            .build()?;
        self.client.execute(&request).await?.json().await
    }
}
