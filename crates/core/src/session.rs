//! Game session - the single-writer gameplay state machine.
//!
//! The session owns the grid and the current piece and is the only code
//! that mutates them. The concurrent runtime drives it with exactly two
//! entry points per tick: `handle_command` for each drained player command,
//! then `tick` to advance physics. Keeping the session synchronous makes
//! the single-writer rule a matter of ownership and keeps every rule
//! testable without a runtime.
//!
//! Lifecycle: each spawn places a random catalog piece at the top center;
//! the piece descends one row per fall interval (or immediately on a soft
//! drop), locks to Static when the descent is rejected, triggers the board
//! sweep, rides out any avalanche, and respawns. A spawn whose cells are
//! already blocked ends the session.

use gridfall_types::{Command, FALL_INTERVAL_TICKS};

use crate::clear::sweep;
use crate::grid::Grid;
use crate::piece::Piece;
use crate::rng::PieceSource;
use crate::snapshot::{BoardSnapshot, PieceSnapshot};

/// Which activity the session is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The player's piece is descending and accepts commands.
    Falling,
    /// A synthetic avalanche piece is descending; control is disabled.
    Avalanching,
    /// Terminal: a spawn was blocked. Nothing advances anymore.
    Over,
}

/// Outcome of a piece lock, surfaced for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub cleared_rows: u8,
    pub avalanche: bool,
}

/// Complete gameplay state behind the engine's game-loop task.
pub struct GameSession {
    grid: Grid,
    piece: Option<Piece>,
    source: Box<dyn PieceSource>,
    phase: Phase,
    fall_interval: u32,
    fall_ticks: u32,
    drop_requested: bool,
    started: bool,
    last_lock: Option<LockReport>,
}

impl GameSession {
    /// Create a session on an empty grid. Call `start` to spawn the first
    /// piece.
    pub fn new(source: Box<dyn PieceSource>) -> Self {
        Self::with_grid(Grid::new(), source)
    }

    /// Create a session over a pre-populated grid (restored boards, test
    /// scenarios). The grid must contain only Empty and Static cells.
    pub fn with_grid(grid: Grid, source: Box<dyn PieceSource>) -> Self {
        Self {
            grid,
            piece: None,
            source,
            phase: Phase::Falling,
            fall_interval: FALL_INTERVAL_TICKS,
            fall_ticks: 0,
            drop_requested: false,
            started: false,
            last_lock: None,
        }
    }

    /// Override the default fall interval (ticks per automatic descent).
    pub fn with_fall_interval(mut self, ticks: u32) -> Self {
        self.fall_interval = ticks.max(1);
        self
    }

    /// Spawn the first piece. A board too full for the first spawn ends the
    /// session immediately.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_next();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Whether player commands currently reach the piece.
    pub fn control_enabled(&self) -> bool {
        self.started && self.phase == Phase::Falling
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    pub fn fall_interval(&self) -> u32 {
        self.fall_interval
    }

    /// Ticks accumulated toward the next automatic descent.
    pub fn fall_progress(&self) -> u32 {
        self.fall_ticks
    }

    /// Restart the fall-interval count, e.g. after a pause is lifted.
    pub fn reset_fall_progress(&mut self) {
        self.fall_ticks = 0;
    }

    /// Take the report of the most recent lock, if one happened.
    pub fn take_last_lock(&mut self) -> Option<LockReport> {
        self.last_lock.take()
    }

    /// Apply one player command. Returns whether it had an effect.
    ///
    /// Commands arriving while control is disabled (avalanche in flight) or
    /// after game over are consumed without effect. Pause is not a session
    /// concern; the runtime's coordinator intercepts it before commands
    /// reach this point.
    pub fn handle_command(&mut self, command: Command) -> bool {
        if !self.control_enabled() {
            return false;
        }
        match command {
            Command::MoveLeft => self.shift_piece(-1, 0),
            Command::MoveRight => self.shift_piece(1, 0),
            Command::SoftDrop => {
                self.drop_requested = true;
                true
            }
            Command::RotateCw => self.spin_piece(true),
            Command::RotateCcw => self.spin_piece(false),
            Command::Pause => false,
        }
    }

    fn shift_piece(&mut self, dx: i8, dy: i8) -> bool {
        match self.piece.as_mut() {
            Some(piece) => piece.try_move(&mut self.grid, dx, dy),
            None => false,
        }
    }

    fn spin_piece(&mut self, clockwise: bool) -> bool {
        match self.piece.as_mut() {
            Some(piece) => piece.try_rotate(&mut self.grid, clockwise),
            None => false,
        }
    }

    /// Advance physics by one clock tick.
    ///
    /// Returns true when the board changed (descent, lock, settle, spawn,
    /// or termination).
    pub fn tick(&mut self) -> bool {
        if !self.started {
            return false;
        }
        match self.phase {
            Phase::Falling => self.tick_falling(),
            Phase::Avalanching => self.tick_avalanching(),
            Phase::Over => false,
        }
    }

    fn tick_falling(&mut self) -> bool {
        // A soft drop bypasses the rest of the interval wait.
        let due = if self.drop_requested {
            true
        } else {
            self.fall_ticks += 1;
            self.fall_ticks >= self.fall_interval
        };
        if !due {
            return false;
        }
        self.fall_ticks = 0;
        self.drop_requested = false;

        let descended = match self.piece.as_mut() {
            Some(piece) => piece.try_move(&mut self.grid, 0, 1),
            None => false,
        };
        if !descended {
            self.lock_and_sweep();
        }
        true
    }

    fn tick_avalanching(&mut self) -> bool {
        let descended = match self.piece.as_mut() {
            Some(piece) => piece.try_move(&mut self.grid, 0, 1),
            None => false,
        };
        if !descended {
            if let Some(piece) = self.piece.take() {
                piece.lock(&mut self.grid);
            }
            self.spawn_next();
        }
        true
    }

    /// Convert the landed piece to Static and run the board sweep. Any
    /// avalanche piece takes over as the falling body, with control
    /// disabled until it settles.
    fn lock_and_sweep(&mut self) {
        if let Some(piece) = self.piece.take() {
            piece.lock(&mut self.grid);
        }

        let outcome = sweep(&mut self.grid);
        self.last_lock = Some(LockReport {
            cleared_rows: outcome.cleared.len() as u8,
            avalanche: outcome.avalanche.is_some(),
        });

        match outcome.avalanche {
            Some(avalanche) => {
                avalanche.place(&mut self.grid);
                self.piece = Some(avalanche);
                self.phase = Phase::Avalanching;
            }
            None => self.spawn_next(),
        }
    }

    /// Bring in the next catalog piece, or end the session if its spawn
    /// cells are already blocked.
    fn spawn_next(&mut self) {
        let kind = self.source.next_shape();
        let color = self.source.next_color();
        let piece = Piece::spawn(kind, color);

        if !self.grid.is_valid(piece.spaces()) {
            self.piece = None;
            self.phase = Phase::Over;
            return;
        }

        piece.place(&mut self.grid);
        self.piece = Some(piece);
        self.phase = Phase::Falling;
        self.fall_ticks = 0;
        self.drop_requested = false;
    }

    /// Fill a snapshot in place (the runtime reuses one allocation inside
    /// its watch channel).
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.write_grid(&self.grid);
        out.piece = self.piece.as_ref().map(PieceSnapshot::from);
        out.game_over = self.game_over();
    }
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("started", &self.started)
            .field("fall_ticks", &self.fall_ticks)
            .field("drop_requested", &self.drop_requested)
            .field("piece", &self.piece)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfall_types::{Marker, PieceColor, ShapeKind, Space, BOARD_HEIGHT, BOARD_WIDTH};

    /// Deterministic source yielding a fixed shape forever.
    struct FixedSource(ShapeKind);

    impl PieceSource for FixedSource {
        fn next_shape(&mut self) -> ShapeKind {
            self.0
        }
        fn next_color(&mut self) -> PieceColor {
            PieceColor::Green
        }
    }

    fn session_with(kind: ShapeKind) -> GameSession {
        let mut session = GameSession::new(Box::new(FixedSource(kind)));
        session.start();
        session
    }

    fn dynamic_cells(grid: &Grid) -> Vec<Space> {
        let mut cells = Vec::new();
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if grid.get(x, y) == Some(Marker::Dynamic) {
                    cells.push((x, y));
                }
            }
        }
        cells
    }

    /// Dynamic markers must equal exactly the piece's visible cells.
    fn assert_occupancy_invariant(session: &GameSession) {
        let mut expected: Vec<Space> = session
            .piece()
            .map(|p| {
                p.spaces()
                    .iter()
                    .copied()
                    .filter(|&(_, y)| y >= 0)
                    .collect()
            })
            .unwrap_or_default();
        expected.sort();
        let mut actual = dynamic_cells(session.grid());
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_start_spawns_valid_piece_at_top_center() {
        let session = session_with(ShapeKind::T);

        let piece = session.piece().expect("piece after start");
        assert!(session.grid().is_valid(piece.spaces()));
        assert_eq!(session.phase(), Phase::Falling);
        assert_occupancy_invariant(&session);
    }

    #[test]
    fn test_piece_descends_once_per_fall_interval() {
        let mut session = session_with(ShapeKind::O);
        let before = session.piece().unwrap().spaces().to_vec();
        let interval = session.fall_interval();

        for _ in 0..interval - 1 {
            session.tick();
            assert_eq!(session.piece().unwrap().spaces(), before.as_slice());
        }
        session.tick();

        let expected: Vec<Space> = before.iter().map(|&(x, y)| (x, y + 1)).collect();
        assert_eq!(session.piece().unwrap().spaces(), expected.as_slice());
        assert_occupancy_invariant(&session);
    }

    #[test]
    fn test_soft_drop_bypasses_interval_wait() {
        let mut session = session_with(ShapeKind::O);
        let before = session.piece().unwrap().spaces().to_vec();

        assert!(session.handle_command(Command::SoftDrop));
        session.tick();

        let expected: Vec<Space> = before.iter().map(|&(x, y)| (x, y + 1)).collect();
        assert_eq!(session.piece().unwrap().spaces(), expected.as_slice());
    }

    #[test]
    fn test_commands_shift_and_spin_piece() {
        let mut session = session_with(ShapeKind::T);
        let before = session.piece().unwrap().spaces().to_vec();

        assert!(session.handle_command(Command::MoveLeft));
        let shifted: Vec<Space> = before.iter().map(|&(x, y)| (x - 1, y)).collect();
        assert_eq!(session.piece().unwrap().spaces(), shifted.as_slice());

        assert!(session.handle_command(Command::MoveRight));
        assert_eq!(session.piece().unwrap().spaces(), before.as_slice());

        assert!(session.handle_command(Command::RotateCw));
        assert_occupancy_invariant(&session);
    }

    #[test]
    fn test_wall_rejection_leaves_state_unchanged() {
        let mut session = session_with(ShapeKind::I);

        // Push the bar against the right wall, then once more.
        assert!(session.handle_command(Command::MoveRight));
        assert!(!session.handle_command(Command::MoveRight));

        let spaces = session.piece().unwrap().spaces().to_vec();
        assert!(spaces.iter().all(|&(x, _)| x < BOARD_WIDTH as i8));
        assert_occupancy_invariant(&session);
    }

    /// Run ticks until the current piece locks, bounded to keep a broken
    /// state machine from hanging the test.
    fn tick_until_lock(session: &mut GameSession) -> LockReport {
        for _ in 0..2000 {
            session.tick();
            if let Some(report) = session.take_last_lock() {
                return report;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn test_piece_locks_static_on_floor() {
        let mut session = session_with(ShapeKind::O);

        let report = tick_until_lock(&mut session);

        assert_eq!(report.cleared_rows, 0);
        assert!(!report.avalanche);
        // The O block settled on the floor as Static cells.
        assert_eq!(session.grid().get(5, 19), Some(Marker::Static));
        assert_eq!(session.grid().get(6, 19), Some(Marker::Static));
        // And a fresh piece respawned.
        assert_eq!(session.phase(), Phase::Falling);
        assert_occupancy_invariant(&session);
    }

    #[test]
    fn test_full_bottom_row_clears_on_lock() {
        // Row 19 complete except the two spawn columns; the O block drops
        // into the gap and completes it.
        let mut grid = Grid::new();
        for x in 0..BOARD_WIDTH as i8 {
            if x != 5 && x != 6 {
                grid.set(x, 19, Marker::Static);
            }
        }
        let mut session =
            GameSession::with_grid(grid, Box::new(FixedSource(ShapeKind::O))).with_fall_interval(1);
        session.start();

        let report = tick_until_lock(&mut session);

        assert_eq!(report.cleared_rows, 1);
        // The O's top half at row 18 is stranded above the cleared row and
        // lifts off as an avalanche.
        assert!(report.avalanche);
        assert_eq!(session.phase(), Phase::Avalanching);
        assert!(!session.control_enabled());
    }

    #[test]
    fn test_avalanche_settles_and_respawns() {
        let mut grid = Grid::new();
        for x in 0..BOARD_WIDTH as i8 {
            if x != 5 && x != 6 {
                grid.set(x, 19, Marker::Static);
            }
        }
        let mut session =
            GameSession::with_grid(grid, Box::new(FixedSource(ShapeKind::O))).with_fall_interval(1);
        session.start();
        tick_until_lock(&mut session);
        assert_eq!(session.phase(), Phase::Avalanching);

        // The avalanche is the O's top half at row 18; one descent lands it
        // on the now-empty floor row.
        while session.phase() == Phase::Avalanching {
            session.tick();
            assert_occupancy_invariant(&session);
        }

        assert_eq!(session.phase(), Phase::Falling);
        assert!(session.control_enabled());
        assert_eq!(session.grid().get(5, 19), Some(Marker::Static));
        assert_eq!(session.grid().get(6, 19), Some(Marker::Static));
    }

    #[test]
    fn test_stranded_cell_rides_avalanche_with_locked_remnant() {
        // Row 19 complete except under the spawn, plus a lone Static cell
        // at (3, 10). Locking the O completes row 19; the sweep lifts both
        // the stray cell and the O's top half into one rigid avalanche,
        // which settles as soon as any of its cells is blocked.
        let mut grid = Grid::new();
        for x in 0..BOARD_WIDTH as i8 {
            if x != 5 && x != 6 {
                grid.set(x, 19, Marker::Static);
            }
        }
        grid.set(3, 10, Marker::Static);
        let mut session =
            GameSession::with_grid(grid, Box::new(FixedSource(ShapeKind::O))).with_fall_interval(1);
        session.start();

        let report = tick_until_lock(&mut session);
        assert!(report.avalanche);
        assert_eq!(session.grid().get(3, 10), Some(Marker::Empty));

        while session.phase() == Phase::Avalanching {
            session.tick();
        }

        // The O's halves reached the floor after one descent, pinning the
        // whole body; the stray cell came down exactly one row with it.
        assert_eq!(session.grid().get(5, 19), Some(Marker::Static));
        assert_eq!(session.grid().get(6, 19), Some(Marker::Static));
        assert_eq!(session.grid().get(3, 11), Some(Marker::Static));
    }

    #[test]
    fn test_blocked_spawn_ends_session() {
        // Pre-fill the spawn area so the first piece cannot appear.
        let mut grid = Grid::new();
        for y in 0..BOARD_HEIGHT as i8 {
            grid.set(5, y, Marker::Static);
            grid.set(6, y, Marker::Static);
        }
        let mut session = GameSession::with_grid(grid, Box::new(FixedSource(ShapeKind::O)));
        session.start();

        assert!(session.game_over());
        assert!(session.piece().is_none());
        assert!(dynamic_cells(session.grid()).is_empty());

        // Terminal state: nothing advances, commands are dead.
        assert!(!session.tick());
        assert!(!session.handle_command(Command::MoveLeft));
        assert!(!session.handle_command(Command::SoftDrop));
    }

    #[test]
    fn test_stacking_to_the_top_ends_session() {
        let mut session = session_with(ShapeKind::O);
        // Soft-drop O blocks forever; the center columns fill and the spawn
        // eventually fails.
        for _ in 0..100_000 {
            if session.game_over() {
                break;
            }
            session.handle_command(Command::SoftDrop);
            session.tick();
        }
        assert!(session.game_over());
    }

    #[test]
    fn test_reset_fall_progress_restarts_interval() {
        let mut session = session_with(ShapeKind::O);
        let before = session.piece().unwrap().spaces().to_vec();
        let interval = session.fall_interval();

        // Burn most of the interval, then reset as a resume would.
        for _ in 0..interval - 1 {
            session.tick();
        }
        session.reset_fall_progress();

        // A full interval is needed again before the descent.
        for _ in 0..interval - 1 {
            session.tick();
            assert_eq!(session.piece().unwrap().spaces(), before.as_slice());
        }
        session.tick();
        assert_ne!(session.piece().unwrap().spaces(), before.as_slice());
    }

    #[test]
    fn test_snapshot_mirrors_session_state() {
        let mut session = session_with(ShapeKind::T);
        let mut snapshot = BoardSnapshot::default();

        session.snapshot_into(&mut snapshot);

        assert!(!snapshot.game_over);
        let piece = snapshot.piece.as_ref().expect("piece in snapshot");
        assert_eq!(piece.spaces, session.piece().unwrap().spaces());
        assert_eq!(snapshot.cells, *session.grid().cells());

        session.handle_command(Command::MoveLeft);
        session.snapshot_into(&mut snapshot);
        assert_eq!(
            snapshot.piece.as_ref().unwrap().spaces,
            session.piece().unwrap().spaces()
        );
    }
}
