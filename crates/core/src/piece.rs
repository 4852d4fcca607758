//! Piece module - the live falling shape.
//!
//! A piece stores its absolute cell positions, a display color, and a queue
//! of pivot candidates for rotation. Movement and rotation follow the
//! validate-then-commit discipline: the grid is only touched once the
//! candidate placement has passed collision validation.

use std::collections::VecDeque;

use gridfall_types::{Marker, PieceColor, ShapeKind, Space};

use crate::grid::Grid;
use crate::shapes::{pivot_cycle, rotate_spaces, spawn_spaces};

/// A live falling shape occupying Dynamic cells of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    spaces: Vec<Space>,
    color: PieceColor,
    pivots: VecDeque<usize>,
}

impl Piece {
    /// Create a catalog piece at the top-center spawn position.
    ///
    /// The caller is responsible for validating the spawn placement and
    /// marking the cells Dynamic.
    pub fn spawn(kind: ShapeKind, color: PieceColor) -> Self {
        Self {
            spaces: spawn_spaces(kind).to_vec(),
            color,
            pivots: pivot_cycle(kind).iter().copied().collect(),
        }
    }

    /// Create a synthetic avalanche piece from already-absolute cells.
    ///
    /// Avalanche pieces carry no pivots: they fall straight down and never
    /// rotate.
    pub fn avalanche(spaces: Vec<Space>, color: PieceColor) -> Self {
        Self {
            spaces,
            color,
            pivots: VecDeque::new(),
        }
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn color(&self) -> PieceColor {
        self.color
    }

    /// Whether the piece can rotate at all.
    pub fn rotatable(&self) -> bool {
        !self.pivots.is_empty()
    }

    /// Try to shift every cell by (dx, dy).
    ///
    /// A zero vector is a failing no-op. On success the old cells are
    /// blanked, the new cells marked Dynamic, and the move committed; on
    /// failure the piece and grid are left untouched.
    pub fn try_move(&mut self, grid: &mut Grid, dx: i8, dy: i8) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }

        let candidate: Vec<Space> = self.spaces.iter().map(|&(x, y)| (x + dx, y + dy)).collect();
        if !grid.is_valid(&candidate) {
            return false;
        }

        self.commit(grid, candidate);
        true
    }

    /// Try to rotate a quarter turn about the current pivot candidate.
    ///
    /// The pivot queue cycles front-to-back before validation, so a rejected
    /// rotation still advances to the next candidate - retrying the same
    /// command can succeed around a different center.
    pub fn try_rotate(&mut self, grid: &mut Grid, clockwise: bool) -> bool {
        let Some(&pivot) = self.pivots.front() else {
            return false;
        };
        self.pivots.rotate_left(1);

        let center = self.spaces[pivot];
        let candidate = rotate_spaces(&self.spaces, center, clockwise);
        if !grid.is_valid(&candidate) {
            return false;
        }

        self.commit(grid, candidate);
        true
    }

    /// Mark the piece's cells Dynamic without moving them (spawn placement).
    pub fn place(&self, grid: &mut Grid) {
        grid.mark(&self.spaces, Marker::Dynamic);
    }

    /// Convert the piece's cells to Static. Consumes the piece: a locked
    /// shape is no longer a piece, just grid cells.
    pub fn lock(self, grid: &mut Grid) {
        grid.mark(&self.spaces, Marker::Static);
    }

    /// Blank the old cells, mark the new ones, adopt the new position.
    /// Old-then-new ordering keeps cells shared by both placements Dynamic.
    fn commit(&mut self, grid: &mut Grid, candidate: Vec<Space>) {
        grid.mark(&self.spaces, Marker::Empty);
        grid.mark(&candidate, Marker::Dynamic);
        self.spaces = candidate;
    }
}
