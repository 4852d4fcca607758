//! Core game logic - pure, deterministic, and testable.
//!
//! This crate holds every gameplay rule with **zero dependencies** on
//! runtimes, channels, or I/O:
//!
//! - [`grid`]: 10x20 marker grid with the collision-validation contract
//! - [`shapes`]: shape catalog as data tables plus the free rotation function
//! - [`piece`]: the live falling shape with its pivot-cycling rotation
//! - [`clear`]: full-row sweeping and avalanche synthesis
//! - [`rng`]: seeded LCG and the injectable piece/color source
//! - [`session`]: the single-writer state machine driven once per tick
//! - [`snapshot`]: the render-feed types
//!
//! The concurrent runtime in `gridfall-engine` owns one [`GameSession`] and
//! is the only writer; everything here can also be driven synchronously,
//! which is how the unit tests exercise the rules.
//!
//! # Example
//!
//! ```
//! use gridfall_core::{GameSession, RandomPieceSource};
//! use gridfall_types::Command;
//!
//! let mut session = GameSession::new(Box::new(RandomPieceSource::new(12345)));
//! session.start();
//!
//! session.handle_command(Command::MoveLeft);
//! session.handle_command(Command::SoftDrop);
//! session.tick();
//!
//! assert!(!session.game_over());
//! ```

pub mod clear;
pub mod grid;
pub mod piece;
pub mod rng;
pub mod session;
pub mod shapes;
pub mod snapshot;

pub use gridfall_types as types;

// Re-export commonly used types for convenience
pub use clear::{sweep, SweepOutcome, AVALANCHE_COLOR};
pub use grid::{Grid, RowFill, CELL_COUNT};
pub use piece::Piece;
pub use rng::{PieceSource, RandomPieceSource, SimpleRng};
pub use session::{GameSession, LockReport, Phase};
pub use shapes::{offsets, pivot_cycle, rotate_spaces, spawn_spaces, SPAWN_X};
pub use snapshot::{BoardSnapshot, PieceSnapshot};
