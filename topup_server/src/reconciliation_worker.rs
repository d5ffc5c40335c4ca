use log::*;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use topup_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase};

use crate::{config::ReconciliationConfig, integrations::digiflazz::DigiflazzGateway};

/// Starts the reconciliation worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Every tick, the oldest pending orders (up to the configured batch size) are checked with the vendor. Passes run
/// one after the other, so they never overlap.
pub fn start_reconciliation_worker(
    db: SqliteDatabase,
    vendor: DigiflazzGateway,
    producers: EventProducers,
    config: ReconciliationConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(config.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let api = OrderFlowApi::new(db, vendor, producers);
        info!(
            "🕰️ Pending order reconciliation worker started. Checking up to {} orders every {}s",
            config.batch_size,
            config.interval.as_secs()
        );
        loop {
            timer.tick().await;
            trace!("🕰️ Running pending order reconciliation job");
            match api.reconcile_pending(config.batch_size).await {
                Ok(result) if result.checked == 0 => trace!("🕰️ No pending orders"),
                Ok(result) => {
                    info!(
                        "🕰️ {} pending orders checked. {} resolved, {} still pending",
                        result.checked, result.resolved, result.still_pending
                    );
                    if result.failures > 0 {
                        warn!("🕰️ {} pending orders could not be checked this time round", result.failures);
                    }
                },
                Err(e) => {
                    error!("🕰️ Error running pending order reconciliation job: {e}");
                },
            }
        }
    })
}
