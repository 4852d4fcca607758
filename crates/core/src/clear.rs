//! Line-clear engine - full-row clearing and avalanche synthesis.
//!
//! Clearing is two-phase: every full row is blanked first, then the cells
//! stranded above the topmost cleared row are lifted off the grid into a
//! synthetic avalanche piece. The session lets that piece fall back into
//! the vacated space one row per tick until it settles.

use arrayvec::ArrayVec;

use gridfall_types::{Marker, PieceColor, BOARD_HEIGHT, BOARD_WIDTH};

use crate::grid::{Grid, RowFill};
use crate::piece::Piece;

/// Fixed display tag for avalanche pieces.
pub const AVALANCHE_COLOR: PieceColor = PieceColor::White;

const MAX_ROWS: usize = BOARD_HEIGHT as usize;

/// Result of one board sweep.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Rows that were full and got blanked, bottom to top.
    pub cleared: ArrayVec<i8, MAX_ROWS>,
    /// Piece built from the Static cells stranded above the topmost
    /// cleared row, if any.
    pub avalanche: Option<Piece>,
}

impl SweepOutcome {
    pub fn nothing_cleared(&self) -> bool {
        self.cleared.is_empty()
    }
}

/// Scan the grid, clear full rows, and synthesize the avalanche piece.
///
/// Rows are scanned bottom-up and the classification stops at the first
/// fully empty row: a contiguous stack never continues past a gap. Every
/// full row encountered is blanked. When at least one row was cleared,
/// every cell still Static above the topmost cleared row is collected into
/// a non-rotatable avalanche piece and its source cell blanked, so the
/// caller can re-mark the piece Dynamic and let it fall.
pub fn sweep(grid: &mut Grid) -> SweepOutcome {
    let mut cleared = ArrayVec::new();

    for y in (0..BOARD_HEIGHT as i8).rev() {
        match grid.row_fill(y) {
            RowFill::Empty => break,
            RowFill::Full => {
                grid.clear_row(y);
                cleared.push(y);
            }
            RowFill::Partial => {}
        }
    }

    let Some(&top) = cleared.last() else {
        return SweepOutcome {
            cleared,
            avalanche: None,
        };
    };

    let mut stranded = Vec::new();
    for y in 0..top {
        for x in 0..BOARD_WIDTH as i8 {
            if grid.get(x, y) == Some(Marker::Static) {
                stranded.push((x, y));
            }
        }
    }

    let avalanche = if stranded.is_empty() {
        None
    } else {
        grid.mark(&stranded, Marker::Empty);
        Some(Piece::avalanche(stranded, AVALANCHE_COLOR))
    };

    SweepOutcome { cleared, avalanche }
}
