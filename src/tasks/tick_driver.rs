//! One-second tick driver for the study countdown

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{debug, info};

use crate::{state::AppState, timer::TickOutcome};

/// Background task that ticks the timer once per second while it runs.
///
/// The interval only exists while the running flag is set; it is dropped as
/// soon as the flag clears or the countdown finishes, so a stale interval
/// can never tick a paused timer.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting tick driver task");

    let mut running_rx = state.running_tx.subscribe();

    loop {
        if !*running_rx.borrow_and_update() {
            // Wait for the timer to start
            if running_rx.changed().await.is_err() {
                break;
            }
            continue;
        }

        debug!("Timer running, ticking every second");
        let mut ticker = interval(Duration::from_secs(1));
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match state.tick().await {
                        TickOutcome::Ticked { remaining_seconds } => {
                            if remaining_seconds % 60 == 0 {
                                debug!("{} minutes left", remaining_seconds / 60);
                            }
                        }
                        TickOutcome::Completed(_) | TickOutcome::Idle => break,
                    }
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Timer stopped, cancelling ticks");
                        break;
                    }
                }
            }
        }
    }

    info!("Tick driver stopped");
}
