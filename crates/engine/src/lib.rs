//! Concurrent engine runtime - clock, control processing, and the game loop.
//!
//! Three coordinated tasks drive one [`GameSession`](gridfall_core::GameSession):
//!
//! - the **clock** broadcasts a monotonic tick counter on a fixed period;
//! - the **control processor** drains the external command queue once per
//!   tick, toggles the pause coordinator, and hands the game loop one batch
//!   per tick;
//! - the **game loop** exclusively owns the session, applies the batch,
//!   advances physics, and publishes snapshots.
//!
//! The grid and piece are only ever touched by the game-loop task, so the
//! single-writer rule is structural. All coordination is over channels:
//! broadcast for ticks, mpsc for commands and batches, watch for snapshots
//! and pause state, oneshot for the game-over event. Shutdown stops the
//! clock and cascades through channel closure.
//!
//! # Example
//!
//! ```no_run
//! use gridfall_engine::{spawn, EngineConfig};
//! use gridfall_types::Command;
//!
//! # async fn run() -> gridfall_engine::Result<()> {
//! let mut engine = spawn(EngineConfig::default())?;
//!
//! // Input source side.
//! engine.send(Command::MoveLeft);
//! engine.send(Command::SoftDrop);
//!
//! // Renderer side.
//! let mut snapshots = engine.snapshots();
//! snapshots.changed().await.ok();
//! let board = snapshots.borrow().clone();
//!
//! // UI side.
//! let game_over = engine.take_game_over().unwrap();
//! # let _ = (board, game_over);
//! engine.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
mod control;
pub mod error;
mod game_loop;
pub mod pause;
pub mod runtime;

pub use gridfall_core as core;
pub use gridfall_types as types;

// Re-export the external surface for convenience
pub use clock::Tick;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use pause::{PauseCoordinator, PauseState};
pub use runtime::{spawn, spawn_with_session, EngineHandle};
