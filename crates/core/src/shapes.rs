//! Shape catalog - piece geometries and their rotation pivots.
//!
//! Each shape is described by data alone: four spawn offsets and a cycle of
//! pivot candidates (indices into the offset list). Rotation is a free
//! function over that data rather than per-shape behavior.

use gridfall_types::{ShapeKind, Space, BOARD_WIDTH};

/// Spawn column for new pieces; offsets extend rightward from here.
pub const SPAWN_X: i8 = BOARD_WIDTH as i8 / 2;

/// Relative cell offsets for a shape in its spawn orientation.
pub fn offsets(kind: ShapeKind) -> [Space; 4] {
    match kind {
        ShapeKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        ShapeKind::S => [(0, 1), (1, 1), (1, 0), (2, 0)],
        ShapeKind::Z => [(0, 0), (1, 0), (1, 1), (2, 1)],
        ShapeKind::T => [(0, 1), (1, 0), (1, 1), (2, 1)],
        ShapeKind::J => [(0, 0), (0, 1), (1, 1), (2, 1)],
        ShapeKind::L => [(0, 1), (1, 1), (2, 0), (2, 1)],
        ShapeKind::I => [(0, 0), (1, 0), (2, 0), (3, 0)],
    }
}

/// Pivot candidates for a shape, as indices into its cell list.
///
/// Successive rotations cycle through the candidates, so shapes with two
/// pivots alternate their rotation center. An empty cycle means the shape
/// never rotates (the O block, and synthetic avalanche pieces).
pub fn pivot_cycle(kind: ShapeKind) -> &'static [usize] {
    match kind {
        ShapeKind::O => &[],
        ShapeKind::S => &[1, 2],
        ShapeKind::Z => &[1, 2],
        ShapeKind::T => &[2],
        ShapeKind::J => &[2],
        ShapeKind::L => &[1],
        ShapeKind::I => &[1, 2],
    }
}

/// Absolute cell positions for a shape freshly spawned at the top center.
pub fn spawn_spaces(kind: ShapeKind) -> [Space; 4] {
    let mut spaces = offsets(kind);
    for (x, _) in &mut spaces {
        *x += SPAWN_X;
    }
    spaces
}

/// Rotate cells a quarter turn about a center cell.
///
/// Each cell is translated so the center sits at the origin, multiplied as
/// a row vector by `[[cos t, sin t], [-sin t, cos t]]` with t = +-90
/// degrees, translated back, and rounded to the nearest integer. Quarter
/// turns of integer offsets are exactly representable up to negligible
/// float error, so the rounding is lossless.
pub fn rotate_spaces(spaces: &[Space], center: Space, clockwise: bool) -> Vec<Space> {
    let theta = if clockwise {
        std::f64::consts::FRAC_PI_2
    } else {
        -std::f64::consts::FRAC_PI_2
    };
    let (sin, cos) = theta.sin_cos();
    let (cx, cy) = center;

    spaces
        .iter()
        .map(|&(x, y)| {
            let dx = (x - cx) as f64;
            let dy = (y - cy) as f64;
            let rx = dx * cos - dy * sin;
            let ry = dx * sin + dy * cos;
            (rx.round() as i8 + cx, ry.round() as i8 + cy)
        })
        .collect()
}
