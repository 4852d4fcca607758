//! Board snapshot types - the render feed contract.
//!
//! After every mutating operation the engine publishes the full marker
//! array plus the current piece. A renderer only ever observes states that
//! satisfy the occupancy invariants: Dynamic cells equal exactly the
//! visible cells of the current piece.

use gridfall_types::{Marker, PieceColor, Space};

use crate::grid::{Grid, CELL_COUNT};
use crate::piece::Piece;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceSnapshot {
    pub spaces: Vec<Space>,
    pub color: PieceColor,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            spaces: piece.spaces().to_vec(),
            color: piece.color(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub cells: [Marker; CELL_COUNT],
    pub piece: Option<PieceSnapshot>,
    pub paused: bool,
    pub game_over: bool,
    /// Clock tick the snapshot was taken on (0 before the first tick).
    pub tick: u64,
}

impl BoardSnapshot {
    pub fn write_grid(&mut self, grid: &Grid) {
        self.cells = *grid.cells();
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            cells: [Marker::Empty; CELL_COUNT],
            piece: None,
            paused: false,
            game_over: false,
            tick: 0,
        }
    }
}
