//! Engine runtime - task wiring and the external handle.
//!
//! `spawn` starts the three coordinated tasks (clock, control processor,
//! game loop) on the current tokio runtime and returns an [`EngineHandle`]
//! carrying every external interface: the command sender for an input
//! source, the snapshot feed for a renderer, the pause feed, the one-shot
//! game-over event, and shutdown.

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use gridfall_core::rng::RandomPieceSource;
use gridfall_core::session::GameSession;
use gridfall_core::snapshot::BoardSnapshot;

use gridfall_types::Command;

use crate::clock::{spawn_clock, Tick};
use crate::config::EngineConfig;
use crate::control::spawn_control;
use crate::error::{EngineError, Result};
use crate::game_loop::spawn_game_loop;
use crate::pause::{PauseCoordinator, PauseState};

/// Backlog for the tick broadcast; consumers that fall this far behind are
/// told they lagged rather than fed stale ticks.
const TICK_BACKLOG: usize = 64;

/// Start an engine with the default seeded piece source.
///
/// Must be called within a tokio runtime.
pub fn spawn(config: EngineConfig) -> Result<EngineHandle> {
    let source = RandomPieceSource::new(config.seed);
    let session =
        GameSession::new(Box::new(source)).with_fall_interval(config.fall_interval_ticks);
    spawn_with_session(config, session)
}

/// Start an engine around a prepared session (custom piece source or
/// pre-populated grid). The session keeps its own fall interval; the
/// config's `fall_interval_ticks` only applies to sessions built by
/// [`spawn`].
pub fn spawn_with_session(config: EngineConfig, session: GameSession) -> Result<EngineHandle> {
    config.validate()?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (tick_tx, tick_rx) = broadcast::channel::<Tick>(TICK_BACKLOG);
    let (input_tx, input_rx) = mpsc::unbounded_channel::<Command>();
    let (batch_tx, batch_rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(BoardSnapshot::default());
    let (over_tx, over_rx) = oneshot::channel();

    let coordinator = PauseCoordinator::new();
    let pause_rx = coordinator.subscribe();

    let clock_task = spawn_clock(config.tick_period, tick_tx, shutdown_rx);
    let control_task = spawn_control(tick_rx, input_rx, coordinator, batch_tx);
    let game_task = spawn_game_loop(session, batch_rx, snapshot_tx, over_tx);

    debug!(
        tick_ms = config.tick_period.as_millis() as u64,
        fall_interval = config.fall_interval_ticks,
        "engine started"
    );

    Ok(EngineHandle {
        commands: input_tx,
        snapshots: snapshot_rx,
        pause: pause_rx,
        game_over: Some(over_rx),
        shutdown: shutdown_tx,
        clock_task,
        control_task,
        game_task,
    })
}

/// Handle to a running engine. All collaborator interfaces hang off this;
/// nothing else reaches the grid or piece.
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<BoardSnapshot>,
    pause: watch::Receiver<PauseState>,
    game_over: Option<oneshot::Receiver<()>>,
    shutdown: watch::Sender<bool>,
    clock_task: JoinHandle<()>,
    control_task: JoinHandle<()>,
    game_task: JoinHandle<()>,
}

impl EngineHandle {
    /// Queue a command for the next tick. Returns false once the engine has
    /// shut down.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    /// A detachable command sender for the input-source collaborator.
    pub fn sender(&self) -> mpsc::UnboundedSender<Command> {
        self.commands.clone()
    }

    /// A snapshot receiver for the renderer collaborator. Snapshots always
    /// satisfy the occupancy invariants; the watch channel coalesces to the
    /// latest state.
    pub fn snapshots(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshots.clone()
    }

    /// Clone of the most recently published snapshot.
    pub fn latest_snapshot(&self) -> BoardSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Pause-state receiver for collaborators mirroring pause in their UI.
    pub fn pause_feed(&self) -> watch::Receiver<PauseState> {
        self.pause.clone()
    }

    /// The one-shot game-over event. Resolves `Ok(())` when the loop
    /// terminates; errs if the engine is shut down before that. Can only be
    /// taken once.
    pub fn take_game_over(&mut self) -> Option<oneshot::Receiver<()>> {
        self.game_over.take()
    }

    /// Stop the clock and wait for the cascade to wind down every task.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(true);

        for (activity, task) in [
            ("clock", self.clock_task),
            ("control", self.control_task),
            ("game loop", self.game_task),
        ] {
            task.await
                .map_err(|source| EngineError::TaskFailed { activity, source })?;
        }

        debug!("engine shut down");
        Ok(())
    }
}
