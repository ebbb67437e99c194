//! Fetch recent trips from a BillFusion backend.
//!
//! To run this example:
//! ```bash
//! export BILLFUSION_API_URL="http://localhost:8080"
//! export BILLFUSION_ACCESS_TOKEN="your-token-here"  # Optional
//! cargo run --example fetch_trips
//! ```

use std::sync::Arc;

use anyhow::Result;
use billfusion_api::{TripFilter, TripsApi};
use billfusion_client::{BillFusionClient, ClientConfig, MemoryCredentialStore, NoopNavigator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env()?.with_debug(true);

    let credentials = Arc::new(MemoryCredentialStore::new());
    if let Ok(token) = std::env::var("BILLFUSION_ACCESS_TOKEN") {
        credentials.set_token(token);
    }

    let client = BillFusionClient::new(config, credentials, Arc::new(NoopNavigator))?;
    let trips = TripsApi::new(client);

    let filter = TripFilter {
        per_page: Some(10),
        ..TripFilter::default()
    };
    let page = trips.list(&filter).await?;

    for trip in &page.data {
        println!(
            "{}  {} -> {}  ({} mi, {} cents)",
            trip.id, trip.pickup_location, trip.dropoff_location, trip.distance_miles, trip.fare_cents
        );
    }
    println!("page {} / {} total trips", page.page, page.total);

    Ok(())
}
