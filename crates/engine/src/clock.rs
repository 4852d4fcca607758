//! Clock task - the periodic tick broadcaster.
//!
//! Every scheduling decision in the engine hangs off this one cadence. The
//! clock sends a monotonically increasing counter so subscribers can detect
//! skipped ticks instead of racing a bare notification, and it keeps
//! running after game over - other consumers may still be listening - until
//! the engine owner signals shutdown.

use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Monotonic tick counter, starting at 1 for the first tick.
pub type Tick = u64;

pub(crate) fn spawn_clock(
    period: Duration,
    tick_tx: broadcast::Sender<Tick>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick: Tick = 0;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    tick += 1;
                    // An error only means nobody is subscribed right now.
                    let _ = tick_tx.send(tick);
                }
                changed = shutdown.changed() => {
                    match changed {
                        Ok(()) if !*shutdown.borrow() => continue,
                        // Flag raised, or the owner dropped the handle.
                        _ => break,
                    }
                }
            }
        }

        debug!(last_tick = tick, "clock stopped");
    })
}
