/// Live state of the level being played.
///
/// Built from a `LevelLayout` template on level entry and torn down on
/// clear. Everything here except the grid is in screen units, so the one
/// `pan` operation is what keeps entities and terrain lined up when the
/// camera moves.

use tracing::{debug, warn};

use crate::domain::entity::{Creature, Hazard, Scrolls, StaticBlock, Treasure};
use crate::domain::geometry::Rect;
use crate::domain::level::LevelLayout;
use crate::domain::tile::{Tile, TileGrid, SPAWN_LAYER, TERRAIN_LAYER};
use crate::domain::viewport::{Rails, Viewport};

/// Ticks per animation frame.
pub const FRAME_TICKS: u64 = 5;

pub const HAZARD_NAME: &str = "blob";
pub const HAZARD_DAMAGE: i32 = 100;
pub const HAZARD_FRAMES: u32 = 10;
pub const CREATURE_NAME: &str = "teen yorp";
pub const CREATURE_HP: i32 = 100;
pub const CREATURE_DAMAGE: i32 = 100;
pub const CREATURE_FRAMES: u32 = 4;
pub const PORTAL_FRAMES: u32 = 5;

#[derive(Clone, Debug, Default)]
pub struct PlayField {
    pub grid: TileGrid,
    pub hazards: Vec<Hazard>,
    pub creatures: Vec<Creature>,
    pub treasures: Vec<Treasure>,
    pub blocks: Vec<StaticBlock>,
    pub rails: Rails,
    /// Exit portal in world units.
    pub exit: Rect,
    pub key_item: bool,
    /// Shared frame for creatures and the portal.
    pub frame: u32,
}

impl PlayField {
    /// Copy the template's layers and spawn its entities as seen through
    /// `view`. Each cell `i` lands at its world origin plus the offset.
    pub fn setup(layout: &LevelLayout, view: &Viewport) -> Self {
        let grid = TileGrid::from_layers(&layout.layout);
        let mut field = PlayField {
            rails: Rails::for_content(grid.width(), grid.height()),
            exit: layout.exit_rect(),
            ..PlayField::default()
        };

        for (idx, code) in grid.occupied(SPAWN_LAYER) {
            let (wx, wy) = TileGrid::origin_of(idx);
            let (x, y) = view.to_screen(wx, wy);
            match Tile::from_code(code) {
                Tile::Hazard => field
                    .hazards
                    .push(Hazard::new(HAZARD_NAME, x, y, HAZARD_DAMAGE, HAZARD_FRAMES)),
                Tile::Creature => field
                    .creatures
                    .push(Creature::new(CREATURE_NAME, x, y, CREATURE_HP, CREATURE_DAMAGE)),
                tile => match tile.treasure_id().and_then(|id| Treasure::new(id, idx, x, y)) {
                    Some(treasure) => field.treasures.push(treasure),
                    None => warn!(level = %layout.name, cell = idx, code, "unknown spawn code"),
                },
            }
        }

        for (idx, code) in grid.occupied(TERRAIN_LAYER) {
            if Tile::from_code(code) == Tile::Block {
                let (wx, wy) = TileGrid::origin_of(idx);
                let (x, y) = view.to_screen(wx, wy);
                field.blocks.push(StaticBlock::new(x, y));
            }
        }

        field.grid = grid;
        debug!(
            level = %layout.name,
            hazards = field.hazards.len(),
            creatures = field.creatures.len(),
            treasures = field.treasures.len(),
            blocks = field.blocks.len(),
            "level setup"
        );
        field
    }

    /// Drop every live entity and the grid copy.
    pub fn clear(&mut self) {
        self.hazards.clear();
        self.creatures.clear();
        self.treasures.clear();
        self.blocks.clear();
        self.grid = TileGrid::default();
        self.key_item = false;
    }

    #[cfg(test)]
    pub fn is_clear(&self) -> bool {
        self.hazards.is_empty()
            && self.creatures.is_empty()
            && self.treasures.is_empty()
            && self.blocks.is_empty()
    }

    /// Move the camera by (dx, dy), clamped to the rails, and carry every
    /// live entity along. Returns the delta actually applied.
    pub fn pan(&mut self, view: &mut Viewport, dx: i32, dy: i32) -> (i32, i32) {
        let (dx, dy) = self.rails.clamp_pan(view, dx, dy);
        if dx == 0 && dy == 0 {
            return (0, 0);
        }
        view.x += dx;
        view.y += dy;
        shift_all(&mut self.hazards, dx, dy);
        shift_all(&mut self.creatures, dx, dy);
        shift_all(&mut self.treasures, dx, dy);
        shift_all(&mut self.blocks, dx, dy);
        (dx, dy)
    }

    /// Exit portal as seen through `view`.
    pub fn exit_on_screen(&self, view: &Viewport) -> Rect {
        self.exit.translate(view.x, view.y)
    }

    /// Advance animation frames from the session tick count.
    pub fn animate(&mut self, count: u64) {
        let step = count / FRAME_TICKS;
        for hazard in &mut self.hazards {
            hazard.frame = (step % u64::from(hazard.frame_total.max(1))) as u32;
        }
        for treasure in &mut self.treasures {
            treasure.frame = (step % u64::from(treasure.kind.frames.max(1))) as u32;
        }
        self.frame = (step % u64::from(CREATURE_FRAMES)) as u32;
    }
}

fn shift_all<T: Scrolls>(items: &mut [T], dx: i32, dy: i32) {
    for item in items {
        item.shift(dx, dy);
    }
}
