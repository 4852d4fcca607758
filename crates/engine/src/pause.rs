//! Pause coordination.
//!
//! A binary Running/Paused state on a watch channel. The control processor
//! toggles it in command order; the game loop gates physics on it and
//! restarts the fall interval on resume; external collaborators can
//! subscribe to mirror the state in their UI.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseState {
    Running,
    Paused,
}

impl PauseState {
    pub fn is_paused(&self) -> bool {
        matches!(self, PauseState::Paused)
    }
}

/// Owner side of the pause state.
#[derive(Debug)]
pub struct PauseCoordinator {
    tx: watch::Sender<PauseState>,
}

impl PauseCoordinator {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PauseState::Running);
        Self { tx }
    }

    /// Flip the state and broadcast the change. Returns the new state.
    pub fn toggle(&self) -> PauseState {
        let next = match *self.tx.borrow() {
            PauseState::Running => PauseState::Paused,
            PauseState::Paused => PauseState::Running,
        };
        self.tx.send_replace(next);
        next
    }

    pub fn state(&self) -> PauseState {
        *self.tx.borrow()
    }

    pub fn is_paused(&self) -> bool {
        self.state().is_paused()
    }

    /// A receiver for observers (game loop, renderer).
    pub fn subscribe(&self) -> watch::Receiver<PauseState> {
        self.tx.subscribe()
    }
}

impl Default for PauseCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
