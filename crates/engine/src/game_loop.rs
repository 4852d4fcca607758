//! Game loop task - the single writer.
//!
//! This task exclusively owns the `GameSession` (and with it the grid and
//! piece), so the single-writer rule is enforced by ownership rather than
//! locking. Per batch it applies the pre-filtered commands, gates physics
//! on the pause flag, advances one tick, and publishes a snapshot. Game
//! over fires the one-shot event and ends the task; the clock stays up for
//! any remaining listeners until the engine owner tears everything down.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use gridfall_core::session::GameSession;
use gridfall_core::snapshot::BoardSnapshot;

use crate::clock::Tick;
use crate::control::TickBatch;

pub(crate) fn spawn_game_loop(
    mut session: GameSession,
    mut batches: mpsc::UnboundedReceiver<TickBatch>,
    snapshots: watch::Sender<BoardSnapshot>,
    game_over: oneshot::Sender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        session.start();
        publish(&snapshots, &session, 0, false);
        if session.game_over() {
            info!("board cannot accept the first piece");
            let _ = game_over.send(());
            return;
        }

        let mut was_paused = false;
        while let Some(mut batch) = batches.recv().await {
            // Commands first, physics second: input from this tick always
            // lands before gravity does.
            for command in batch.commands.drain(..) {
                session.handle_command(command);
            }

            if batch.paused {
                was_paused = true;
                publish(&snapshots, &session, batch.tick, true);
                continue;
            }
            if was_paused {
                was_paused = false;
                session.reset_fall_progress();
                debug!(tick = batch.tick, "resumed, fall interval restarted");
            }

            session.tick();
            if let Some(report) = session.take_last_lock() {
                debug!(
                    tick = batch.tick,
                    cleared = report.cleared_rows,
                    avalanche = report.avalanche,
                    "piece locked"
                );
            }
            publish(&snapshots, &session, batch.tick, false);

            if session.game_over() {
                info!(tick = batch.tick, "game over");
                let _ = game_over.send(());
                break;
            }
        }

        debug!("game loop stopped");
    })
}

/// Refresh the watch channel in place; receivers always observe a state
/// satisfying the occupancy invariants.
fn publish(
    snapshots: &watch::Sender<BoardSnapshot>,
    session: &GameSession,
    tick: Tick,
    paused: bool,
) {
    snapshots.send_modify(|out| {
        session.snapshot_into(out);
        out.tick = tick;
        out.paused = paused;
    });
}
