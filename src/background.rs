use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info};
use crate::state::AppState;

const SWEEP_INTERVAL_SECS: u64 = 60;

/// Periodic sweeper that expires timeslot claims whose occurrence day has
/// ended. Claims stay in storage for the night's roster; only their status
/// flips.
pub async fn start_claim_expiry_worker(state: Arc<AppState>) {
    info!("Starting claim expiry worker...");

    loop {
        match state.claim_repo.expire_older_than(Utc::now()).await {
            Ok(0) => {}
            Ok(count) => info!("Expired {} stale timeslot claims", count),
            Err(e) => error!("Failed to expire stale claims: {:?}", e),
        }
        sleep(Duration::from_secs(SWEEP_INTERVAL_SECS)).await;
    }
}
