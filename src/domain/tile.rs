/// Tile codes and the layered level grid.
///
/// A level is a stack of equal-length integer layers laid out row-major,
/// `COLUMNS` cells per row. Layer 0 is terrain, layer 1 carries spawn and
/// pickup markers. Cell meaning is queried via `Tile` methods, not stored
/// as flags, so tile semantics are centralized here.
///
/// ## Codes
///   layer 0: 0 empty, 1 solid, 2 portal anchor, 7 static block
///   layer 1: 3 portal gem, 4 shiny ball, 5 hazard, 6 creature
///
/// ## Bounds
///   Lookups outside the grid never panic. Cell reads return 0 (empty).
///   Collision queries treat the side walls and everything below the last
///   row as solid, and open sky above row 0 as passable.

pub const TILE_SIZE: i32 = 50;
pub const COLUMNS: usize = 16;

pub const TERRAIN_LAYER: usize = 0;
pub const SPAWN_LAYER: usize = 1;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    PortalAnchor,
    PortalGem,
    ShinyBall,
    Hazard,
    Creature,
    Block,
    Unknown(i32),
}

impl Tile {
    pub fn from_code(code: i32) -> Tile {
        match code {
            0 => Tile::Empty,
            1 => Tile::Solid,
            2 => Tile::PortalAnchor,
            3 => Tile::PortalGem,
            4 => Tile::ShinyBall,
            5 => Tile::Hazard,
            6 => Tile::Creature,
            7 => Tile::Block,
            other => Tile::Unknown(other),
        }
    }

    #[allow(dead_code)]
    pub fn code(self) -> i32 {
        match self {
            Tile::Empty => 0,
            Tile::Solid => 1,
            Tile::PortalAnchor => 2,
            Tile::PortalGem => 3,
            Tile::ShinyBall => 4,
            Tile::Hazard => 5,
            Tile::Creature => 6,
            Tile::Block => 7,
            Tile::Unknown(code) => code,
        }
    }

    /// Blocks movement and supports feet.
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid | Tile::Block)
    }

    /// Treasure table id, if this cell is a pickup.
    pub fn treasure_id(self) -> Option<i32> {
        match self {
            Tile::PortalGem => Some(3),
            Tile::ShinyBall => Some(4),
            _ => None,
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Layered grid
// ══════════════════════════════════════════════════════════════

/// Live copy of a level's layers. Pickups mutate this copy, never the
/// template the level was loaded from.
#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    layers: Vec<Vec<i32>>,
    rows: usize,
}

impl TileGrid {
    /// Copy layers into a grid. Callers validate shape beforehand; a ragged
    /// stack is tolerated by sizing rows from the shortest layer.
    pub fn from_layers(layers: &[Vec<i32>]) -> Self {
        let cells = layers.iter().map(Vec::len).min().unwrap_or(0);
        TileGrid {
            layers: layers.to_vec(),
            rows: cells / COLUMNS,
        }
    }

    #[cfg(test)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Level extent in world units.
    pub fn width(&self) -> i32 {
        COLUMNS as i32 * TILE_SIZE
    }

    pub fn height(&self) -> i32 {
        self.rows as i32 * TILE_SIZE
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() || self.rows == 0
    }

    /// Cell index for a world-space point, or `None` outside the grid.
    /// Negative coordinates floor toward the cell above/left, so -1 is
    /// never mistaken for column 0.
    pub fn index_at(&self, world_x: i32, world_y: i32) -> Option<usize> {
        let col = world_x.div_euclid(TILE_SIZE);
        let row = world_y.div_euclid(TILE_SIZE);
        if col < 0 || row < 0 || col as usize >= COLUMNS || row as usize >= self.rows {
            return None;
        }
        Some(row as usize * COLUMNS + col as usize)
    }

    /// Raw code at `(layer, index)`; 0 when either is out of range.
    pub fn cell(&self, layer: usize, index: usize) -> i32 {
        self.layers
            .get(layer)
            .and_then(|cells| cells.get(index))
            .copied()
            .unwrap_or(0)
    }

    pub fn tile(&self, layer: usize, index: usize) -> Tile {
        Tile::from_code(self.cell(layer, index))
    }

    /// Terrain solidity at a world point, with the out-of-grid rules above.
    pub fn is_solid_at(&self, world_x: i32, world_y: i32) -> bool {
        let col = world_x.div_euclid(TILE_SIZE);
        let row = world_y.div_euclid(TILE_SIZE);
        if col < 0 || col as usize >= COLUMNS {
            return true;
        }
        if row < 0 {
            return false;
        }
        if row as usize >= self.rows {
            return true;
        }
        self.tile(TERRAIN_LAYER, row as usize * COLUMNS + col as usize)
            .is_solid()
    }

    /// Zero a cell and return what was there. A second take yields 0,
    /// which is what makes pickups idempotent.
    pub fn take(&mut self, layer: usize, index: usize) -> i32 {
        match self.layers.get_mut(layer).and_then(|cells| cells.get_mut(index)) {
            Some(cell) => std::mem::take(cell),
            None => 0,
        }
    }

    /// Nonzero cells of a layer as `(index, code)`.
    pub fn occupied(&self, layer: usize) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.layers
            .get(layer)
            .into_iter()
            .flat_map(|cells| cells.iter().copied().enumerate())
            .filter(|&(_, code)| code != 0)
    }

    /// World-space top-left corner of a cell.
    pub fn origin_of(index: usize) -> (i32, i32) {
        (
            (index % COLUMNS) as i32 * TILE_SIZE,
            (index / COLUMNS) as i32 * TILE_SIZE,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a grid from ASCII rows, one char per column.
    /// `#` solid, `B` block, `P` portal anchor on terrain;
    /// `g` gem, `o` ball, `x` hazard, `c` creature on the spawn layer.
    pub(crate) fn grid_from(rows: &[&str]) -> TileGrid {
        let mut terrain = Vec::new();
        let mut spawn = Vec::new();
        for row in rows {
            let mut chars: Vec<char> = row.chars().collect();
            chars.resize(COLUMNS, ' ');
            for ch in chars.into_iter().take(COLUMNS) {
                let (t, s) = match ch {
                    '#' => (1, 0),
                    'B' => (7, 0),
                    'P' => (2, 0),
                    'g' => (0, 3),
                    'o' => (0, 4),
                    'x' => (0, 5),
                    'c' => (0, 6),
                    _ => (0, 0),
                };
                terrain.push(t);
                spawn.push(s);
            }
        }
        TileGrid::from_layers(&[terrain, spawn])
    }

    #[test]
    fn codes_round_trip_through_tile() {
        for code in 0..=9 {
            assert_eq!(Tile::from_code(code).code(), code);
        }
        assert!(Tile::Solid.is_solid());
        assert!(Tile::Block.is_solid());
        assert!(!Tile::PortalAnchor.is_solid());
        assert!(!Tile::Unknown(42).is_solid());
    }

    #[test]
    fn index_math_matches_row_major_layout() {
        let grid = grid_from(&["", "", ""]);
        assert_eq!(grid.index_at(0, 0), Some(0));
        assert_eq!(grid.index_at(49, 49), Some(0));
        assert_eq!(grid.index_at(50, 0), Some(1));
        assert_eq!(grid.index_at(0, 50), Some(COLUMNS));
        assert_eq!(grid.index_at(799, 149), Some(3 * COLUMNS - 1));
    }

    #[test]
    fn negative_and_far_points_have_no_index() {
        let grid = grid_from(&["", ""]);
        assert_eq!(grid.index_at(-1, 0), None);
        assert_eq!(grid.index_at(0, -1), None);
        assert_eq!(grid.index_at(800, 0), None);
        assert_eq!(grid.index_at(0, 100), None);
    }

    #[test]
    fn cell_reads_out_of_range_are_empty() {
        let grid = grid_from(&["#"]);
        assert_eq!(grid.cell(TERRAIN_LAYER, 0), 1);
        assert_eq!(grid.cell(TERRAIN_LAYER, 999), 0);
        assert_eq!(grid.cell(7, 0), 0);
    }

    #[test]
    fn collision_edges() {
        let grid = grid_from(&["", "   #"]);
        // Side walls and below the floor are solid.
        assert!(grid.is_solid_at(-1, 10));
        assert!(grid.is_solid_at(800, 10));
        assert!(grid.is_solid_at(10, 100));
        // Open sky above row 0.
        assert!(!grid.is_solid_at(10, -400));
        // Interior.
        assert!(grid.is_solid_at(160, 60));
        assert!(!grid.is_solid_at(10, 60));
    }

    #[test]
    fn take_is_idempotent() {
        let mut grid = grid_from(&["g"]);
        assert_eq!(grid.take(SPAWN_LAYER, 0), 3);
        assert_eq!(grid.take(SPAWN_LAYER, 0), 0);
        assert_eq!(grid.take(SPAWN_LAYER, 500), 0);
    }

    #[test]
    fn occupied_skips_empty_cells() {
        let grid = grid_from(&[" x", "c"]);
        let cells: Vec<_> = grid.occupied(SPAWN_LAYER).collect();
        assert_eq!(cells, vec![(1, 5), (COLUMNS, 6)]);
        assert_eq!(TileGrid::origin_of(COLUMNS + 2), (100, 50));
    }
}
