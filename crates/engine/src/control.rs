//! Control processor task - the input-consumption protocol.
//!
//! Once per tick the task drains the external command queue completely, in
//! FIFO order. Pause commands toggle the coordinator at their position in
//! the queue; other commands drained while the game is paused are consumed
//! and discarded. Whatever remains is handed to the game loop as a single
//! batch stamped with the tick number and the post-drain pause state - the
//! hand-off is what guarantees all pending input applies before physics
//! advances for that tick.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use gridfall_types::Command;

use crate::clock::Tick;
use crate::pause::PauseCoordinator;

/// One tick's worth of pre-filtered input for the game loop.
#[derive(Debug)]
pub(crate) struct TickBatch {
    pub tick: Tick,
    pub commands: Vec<Command>,
    /// Pause state after the drain; physics is skipped while set.
    pub paused: bool,
}

pub(crate) fn spawn_control(
    mut ticks: broadcast::Receiver<Tick>,
    mut input: mpsc::UnboundedReceiver<Command>,
    coordinator: PauseCoordinator,
    batches: mpsc::UnboundedSender<TickBatch>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let tick = match ticks.recv().await {
                Ok(tick) => tick,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "tick stream lagged, resuming from the newest tick");
                    continue;
                }
                // The clock is gone; propagate the shutdown instead of
                // spinning on stale state.
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let mut commands = Vec::new();
            loop {
                match input.try_recv() {
                    Ok(Command::Pause) => {
                        let state = coordinator.toggle();
                        debug!(tick, state = ?state, "pause toggled");
                    }
                    Ok(command) => {
                        // Still dequeued while paused, just not forwarded.
                        if !coordinator.is_paused() {
                            commands.push(command);
                        }
                    }
                    // A disconnected input source is the same as an idle
                    // one: gravity keeps going without player input.
                    Err(mpsc::error::TryRecvError::Empty)
                    | Err(mpsc::error::TryRecvError::Disconnected) => break,
                }
            }

            let batch = TickBatch {
                tick,
                commands,
                paused: coordinator.is_paused(),
            };
            if batches.send(batch).is_err() {
                // Game loop ended (game over or shutdown).
                break;
            }
        }

        debug!("control processor stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn harness() -> (
        broadcast::Sender<Tick>,
        mpsc::UnboundedSender<Command>,
        mpsc::UnboundedReceiver<TickBatch>,
        JoinHandle<()>,
    ) {
        let (tick_tx, tick_rx) = broadcast::channel(64);
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        let task = spawn_control(tick_rx, input_rx, PauseCoordinator::new(), batch_tx);
        (tick_tx, input_tx, batch_rx, task)
    }

    #[tokio::test]
    async fn test_queue_drained_fifo_into_one_batch() {
        let (tick_tx, input_tx, mut batch_rx, task) = harness().await;

        input_tx.send(Command::MoveLeft).unwrap();
        input_tx.send(Command::RotateCw).unwrap();
        input_tx.send(Command::MoveRight).unwrap();
        tick_tx.send(1).unwrap();

        let batch = batch_rx.recv().await.expect("one batch per tick");
        assert_eq!(batch.tick, 1);
        assert_eq!(
            batch.commands,
            vec![Command::MoveLeft, Command::RotateCw, Command::MoveRight]
        );
        assert!(!batch.paused);

        task.abort();
        let _ = task.await;
    }

    #[tokio::test]
    async fn test_pause_splits_the_queue_at_its_position() {
        let (tick_tx, input_tx, mut batch_rx, task) = harness().await;

        // MoveLeft precedes the pause and applies; MoveRight follows it and
        // is discarded.
        input_tx.send(Command::MoveLeft).unwrap();
        input_tx.send(Command::Pause).unwrap();
        input_tx.send(Command::MoveRight).unwrap();
        tick_tx.send(1).unwrap();

        let batch = batch_rx.recv().await.unwrap();
        assert_eq!(batch.commands, vec![Command::MoveLeft]);
        assert!(batch.paused);

        // A second pause in a later tick resumes.
        input_tx.send(Command::Pause).unwrap();
        input_tx.send(Command::SoftDrop).unwrap();
        tick_tx.send(2).unwrap();

        let batch = batch_rx.recv().await.unwrap();
        assert_eq!(batch.commands, vec![Command::SoftDrop]);
        assert!(!batch.paused);

        task.abort();
        let _ = task.await;
    }

    #[tokio::test]
    async fn test_empty_ticks_still_produce_batches() {
        let (tick_tx, _input_tx, mut batch_rx, task) = harness().await;

        tick_tx.send(1).unwrap();
        tick_tx.send(2).unwrap();

        assert_eq!(batch_rx.recv().await.unwrap().tick, 1);
        let batch = batch_rx.recv().await.unwrap();
        assert_eq!(batch.tick, 2);
        assert!(batch.commands.is_empty());

        task.abort();
        let _ = task.await;
    }

    #[tokio::test]
    async fn test_clock_closure_stops_the_task() {
        let (tick_tx, _input_tx, _batch_rx, task) = harness().await;

        drop(tick_tx);

        task.await.expect("control task should exit cleanly");
    }
}
