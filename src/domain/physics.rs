/// Tile probes for collision resolution.
///
/// ## Frames
///
/// Bodies live in screen units; the grid lives in world units. Every probe
/// converts with `world = screen - view` before indexing, which keeps the
/// probes correct no matter how far the camera has panned.
///
/// ## Probe points (48×48 body at screen x, y)
///
///   leading edge, moving right:  (x + 49, y)
///   leading edge, moving left:   (x, y)
///   feet:                        (x, y + 49) and (x + 48, y + 49)
///   corners (pickups):           top/base × left/right of the body
///
/// The right-hand probe sits one unit past the body so a player flush
/// against a wall on its right still detects it. Feet sample the row just
/// below the body for the same reason.
///
/// ## Vertical scroll band
///
/// The camera follows vertical motion only while the body is on the far
/// side of the band line (`band`, screen y) from where it is heading and
/// the camera still has rail to spare. Otherwise the body itself moves.

use super::entity::{Facing, PLAYER_SIZE};
use super::tile::{TileGrid, TILE_SIZE};
use super::viewport::{Rails, Viewport};

/// Solid tile under either foot.
pub fn feet_supported(grid: &TileGrid, view: &Viewport, x: i32, y: i32) -> bool {
    let (left, base) = view.to_world(x, y + PLAYER_SIZE + 1);
    let right = left + PLAYER_SIZE;
    grid.is_solid_at(left, base) || grid.is_solid_at(right, base)
}

/// Screen y that rests a body on the floor under its feet, if there is one.
/// The snap puts the top of the body one tile above the floor row's top.
pub fn landing_y(grid: &TileGrid, view: &Viewport, x: i32, y: i32) -> Option<i32> {
    if !feet_supported(grid, view, x, y) {
        return None;
    }
    let (_, base) = view.to_world(x, y + PLAYER_SIZE + 1);
    let floor_top = base.div_euclid(TILE_SIZE) * TILE_SIZE;
    Some(floor_top - TILE_SIZE + view.y)
}

/// Solid tile at the leading edge for motion toward `facing`.
pub fn leading_edge_blocked(grid: &TileGrid, view: &Viewport, x: i32, y: i32, facing: Facing) -> bool {
    let edge_x = match facing {
        Facing::Right => x + PLAYER_SIZE + 1,
        Facing::Left => x,
    };
    let (wx, wy) = view.to_world(edge_x, y);
    grid.is_solid_at(wx, wy)
}

/// Grid cells under the body's four corners, deduplicated, in-grid only.
pub fn corner_cells(grid: &TileGrid, view: &Viewport, x: i32, y: i32) -> Vec<usize> {
    let (left, top) = view.to_world(x, y);
    let right = left + PLAYER_SIZE;
    let base = top + PLAYER_SIZE;
    let mut cells = Vec::with_capacity(4);
    for (px, py) in [(left, top), (right, top), (left, base), (right, base)] {
        if let Some(idx) = grid.index_at(px, py) {
            if !cells.contains(&idx) {
                cells.push(idx);
            }
        }
    }
    cells
}

/// Should a vertical displacement of `velo` pan the camera instead of
/// moving the body?
pub fn vertical_pans(y: i32, velo: i32, view: &Viewport, rails: &Rails, band: i32) -> bool {
    let rising = y < band && velo < 0 && view.y - velo < 0;
    let falling = y > band && velo > 0 && view.y - velo > rails.min_y;
    rising || falling
}

/// Can the anti-float nudge go to the camera?
pub fn fixer_pans(y: i32, view: &Viewport, rails: &Rails, band: i32) -> bool {
    view.y > rails.min_y && y > band
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::tests::grid_from;

    fn level_view() -> Viewport {
        Viewport::bottom_left(600)
    }

    /// 12 rows, floor on the last, a block at column 7 on the row above.
    fn floor_grid() -> TileGrid {
        let mut rows = vec![""; 10];
        rows.push("       #");
        rows.push("################");
        grid_from(&rows)
    }

    #[test]
    fn feet_find_the_floor() {
        let grid = floor_grid();
        let view = level_view();
        // Body top at world 503: base probe at 552 (floor row 11).
        assert!(feet_supported(&grid, &view, 20, 383));
        // Body top at world 450: base probe at 499 (row 9, open).
        assert!(!feet_supported(&grid, &view, 20, 330));
    }

    #[test]
    fn landing_snaps_to_floor_top() {
        let grid = floor_grid();
        let view = level_view();
        // Base probe at world 559 (row 11): top of body lands at world 500.
        assert_eq!(landing_y(&grid, &view, 20, 390), Some(380));
        assert_eq!(landing_y(&grid, &view, 20, 300), None);
    }

    #[test]
    fn one_foot_is_enough() {
        let grid = floor_grid();
        let view = level_view();
        // Right foot over column 7's block (world x 350..400), left foot open.
        assert!(feet_supported(&grid, &view, 320, 333));
    }

    #[test]
    fn leading_edges_are_asymmetric() {
        let grid = floor_grid();
        let view = level_view();
        // Player one tile-width left of the block at column 7, row 10.
        assert!(leading_edge_blocked(&grid, &view, 305, 383, Facing::Right));
        assert!(!leading_edge_blocked(&grid, &view, 295, 383, Facing::Right));
        // Left edge inside the block.
        assert!(leading_edge_blocked(&grid, &view, 399, 383, Facing::Left));
        assert!(!leading_edge_blocked(&grid, &view, 400, 383, Facing::Left));
    }

    #[test]
    fn walls_bound_the_level() {
        let grid = floor_grid();
        let view = level_view();
        assert!(leading_edge_blocked(&grid, &view, -1, 383, Facing::Left));
        assert!(leading_edge_blocked(&grid, &view, 752, 383, Facing::Right));
    }

    #[test]
    fn corners_dedupe_and_drop_out_of_grid() {
        let grid = floor_grid();
        let view = level_view();
        let cells = corner_cells(&grid, &view, 30, 390);
        assert_eq!(cells.len(), 4);
        // Body above the top row only samples in-grid corners.
        let high = corner_cells(&grid, &view, 0, -150);
        assert!(high.len() <= 2);
    }

    #[test]
    fn band_rule() {
        let rails = Rails::for_content(800, 600);
        // Falling below the band with rail left: camera pans.
        assert!(vertical_pans(300, 5, &Viewport::new(0, 0), &rails, 160));
        // Camera already at the bottom rail: body moves.
        assert!(!vertical_pans(300, 5, &Viewport::new(0, -120), &rails, 160));
        // Rising above the band with the camera below its top rail.
        assert!(vertical_pans(100, -5, &Viewport::new(0, -120), &rails, 160));
        assert!(!vertical_pans(100, -5, &Viewport::new(0, 0), &rails, 160));
        assert!(fixer_pans(300, &Viewport::new(0, -100), &rails, 160));
        assert!(!fixer_pans(300, &Viewport::new(0, -120), &rails, 160));
    }
}
