//! Session configuration and bootstrap.

use std::sync::Arc;

use anyhow::Result;

use store::LedgerStore;

use crate::coordinator::Coordinator;

/// Initialize a coordinator session from environment configuration.
///
/// One coordinator exists per authenticated session; consumers receive it by
/// injection rather than through ambient globals.
pub async fn initialize_session(store: Arc<dyn LedgerStore>) -> Result<Coordinator> {
    // Load configuration
    dotenvy::dotenv().ok();
    let owner = std::env::var("FINSYNC_OWNER").unwrap_or_else(|_| "local-user".to_string());

    tracing::info!("Starting session for owner: {}", owner);
    let mut coordinator = Coordinator::new(store, &owner);
    coordinator.load_session().await?;
    Ok(coordinator)
}

/// Get the upcoming-bills horizon from environment or use default
pub fn get_bills_horizon_days() -> i64 {
    std::env::var("FINSYNC_BILLS_HORIZON_DAYS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(7)
}
