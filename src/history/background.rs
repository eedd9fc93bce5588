//! Periodic history snapshots

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info};

use super::persistence::save_history;
use super::HistoryStore;
use crate::config::HistoryConfig;

/// Spawn the task saving the history every `saving_interval_secs`.
///
/// Saving runs on the blocking pool so request handling is never held up.
/// The task stops when `shutdown` receives `true` or its sender is dropped;
/// the final save is left to the caller.
pub fn spawn_historian(
    store: Arc<HistoryStore>,
    config: HistoryConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(config.saving_interval_secs.max(1));
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    info!("Saving history...");
                    let store = Arc::clone(&store);
                    let config = config.clone();
                    match tokio::task::spawn_blocking(move || save_history(&store, &config)).await {
                        Ok(()) => info!("History saved."),
                        Err(e) => error!(error = %e, "History saving task failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Historian stopped");
                        break;
                    }
                }
            }
        }
    })
}
