/// Entities: PlayerCharacter, WorldAvatar, Creature, Hazard, Treasure,
/// StaticBlock.
///
/// Plain position/state records. Positions are in screen units: a level's
/// live entities are translated together with the viewport, so the player
/// and everything it can touch share one coordinate frame.

use super::geometry::Rect;
use super::tile::TILE_SIZE;
use super::viewport::Viewport;

/// Sprite-row offset between the two facings of a creature sheet.
pub const FACING_UNIT: i32 = 50;

pub const PLAYER_SIZE: i32 = 48;
pub const AVATAR_SIZE: i32 = 48;

/// Idle frame of the player run cycle.
pub const PLAYER_REST_FRAME: u32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(self) -> i32 {
        match self {
            Facing::Left => -1,
            Facing::Right => 1,
        }
    }

    /// Map a 0/1 roll onto a facing.
    pub fn from_roll(roll: u32) -> Facing {
        if roll == 0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// 0 or `FACING_UNIT`, the sheet row a sprite is cut from.
    pub fn offset(self) -> i32 {
        match self {
            Facing::Left => 0,
            Facing::Right => FACING_UNIT,
        }
    }
}

/// Discrete physical state of the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Status {
    Ground,
    Jump,
    Fall,
    Dying,
    TotallyDead,
}

/// Overworld heading, used for the avatar sprite.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

// ══════════════════════════════════════════════════════════════
// Player
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct PlayerCharacter {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub y_velo: i32,
    pub x_speed: i32,
    pub facing: Facing,
    pub status: Status,
    pub hp_current: i32,
    pub hp_total: i32,
    pub lives: i32,
    pub frame: u32,
    pub view: Viewport,
}

impl PlayerCharacter {
    pub fn new(name: &str, hp: i32, lives: i32, gravity: i32, speed: i32) -> Self {
        PlayerCharacter {
            name: name.to_string(),
            x: 20,
            y: 380,
            y_velo: gravity,
            x_speed: speed,
            facing: Facing::Right,
            status: Status::Ground,
            hp_current: hp,
            hp_total: hp,
            lives,
            frame: PLAYER_REST_FRAME,
            view: Viewport::default(),
        }
    }

    /// Level entry / retry: fresh hp, standing, camera at the bottom-left
    /// of a level `level_height` units tall.
    pub fn enter_level(&mut self, x: i32, y: i32, level_height: i32, gravity: i32) {
        self.view = Viewport::bottom_left(level_height);
        self.x = x;
        self.y = y;
        self.y_velo = gravity;
        self.hp_current = self.hp_total;
        self.status = Status::Ground;
        self.facing = Facing::Right;
        self.frame = PLAYER_REST_FRAME;
    }

    /// Jump impulse. Only the first tick of a press counts, and only from
    /// the ground. Returns whether the impulse fired.
    pub fn jump(&mut self, held_ticks: u32, gravity: i32) -> bool {
        if self.status == Status::Ground && held_ticks == 1 {
            self.status = Status::Jump;
            self.y_velo = -gravity;
            true
        } else {
            false
        }
    }

    pub fn death(&mut self) {
        self.hp_current = 0;
        self.lives -= 1;
        self.status = Status::Dying;
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.status, Status::Dying | Status::TotallyDead)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

// ══════════════════════════════════════════════════════════════
// Overworld avatar
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct WorldAvatar {
    pub x: i32,
    pub y: i32,
    pub heading: Heading,
    pub speed: i32,
    pub view: Viewport,
}

impl Default for WorldAvatar {
    fn default() -> Self {
        WorldAvatar {
            x: 200,
            y: 300,
            heading: Heading::Down,
            speed: 5,
            view: Viewport::new(-400, -500),
        }
    }
}

impl WorldAvatar {
    /// Position on the world map (screen position minus camera offset).
    pub fn world_position(&self) -> (i32, i32) {
        self.view.to_world(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, AVATAR_SIZE, AVATAR_SIZE)
    }
}

// ══════════════════════════════════════════════════════════════
// Level inhabitants
// ══════════════════════════════════════════════════════════════

/// Anything that rides along when the camera pans.
pub trait Scrolls {
    fn shift(&mut self, dx: i32, dy: i32);
}

#[derive(Clone, Debug)]
pub struct Creature {
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub hp_current: i32,
    pub hp_total: i32,
    pub damage: i32,
    pub wander_ctr: u32,
    pub pause_ctr: u32,
    pub sees_player: bool,
}

impl Creature {
    pub fn new(name: &'static str, x: i32, y: i32, hp: i32, damage: i32) -> Self {
        Creature {
            name,
            x,
            y,
            facing: Facing::Right,
            hp_current: hp,
            hp_total: hp,
            damage,
            wander_ctr: 0,
            pause_ctr: 0,
            sees_player: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, TILE_SIZE, TILE_SIZE)
    }
}

#[derive(Clone, Debug)]
pub struct Hazard {
    pub name: &'static str,
    pub x: i32,
    pub y: i32,
    pub damage: i32,
    pub frame: u32,
    pub frame_total: u32,
}

impl Hazard {
    pub fn new(name: &'static str, x: i32, y: i32, damage: i32, frame_total: u32) -> Self {
        Hazard { name, x, y, damage, frame: 0, frame_total }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, TILE_SIZE, TILE_SIZE)
    }
}

/// Row of the treasure table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreasureKind {
    pub id: i32,
    pub name: &'static str,
    pub value: u32,
    pub width: i32,
    pub height: i32,
    pub frames: u32,
    /// Unlocks the exit portal.
    pub key_item: bool,
}

const TREASURE_TABLE: [TreasureKind; 2] = [
    TreasureKind { id: 3, name: "Portal Gem", value: 0, width: 50, height: 50, frames: 5, key_item: true },
    TreasureKind { id: 4, name: "Shiny Green Ball", value: 10, width: 40, height: 40, frames: 7, key_item: false },
];

impl TreasureKind {
    pub fn lookup(id: i32) -> Option<&'static TreasureKind> {
        TREASURE_TABLE.iter().find(|kind| kind.id == id)
    }
}

#[derive(Clone, Debug)]
pub struct Treasure {
    pub kind: &'static TreasureKind,
    /// Spawn-layer index this treasure was created from.
    pub cell: usize,
    pub x: i32,
    pub y: i32,
    pub collected: bool,
    pub frame: u32,
}

impl Treasure {
    /// `None` for ids missing from the table.
    pub fn new(id: i32, cell: usize, x: i32, y: i32) -> Option<Self> {
        let kind = TreasureKind::lookup(id)?;
        Some(Treasure { kind, cell, x, y, collected: false, frame: 0 })
    }

    /// Drawn centered in its tile.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x + (TILE_SIZE - self.kind.width) / 2,
            self.y + (TILE_SIZE - self.kind.height) / 2,
            self.kind.width,
            self.kind.height,
        )
    }
}

#[derive(Clone, Debug)]
pub struct StaticBlock {
    pub x: i32,
    pub y: i32,
    pub impenetrable: bool,
    pub supportive: bool,
    pub destructible: bool,
    pub damage: i32,
}

impl StaticBlock {
    pub fn new(x: i32, y: i32) -> Self {
        StaticBlock { x, y, impenetrable: true, supportive: true, destructible: false, damage: 0 }
    }
}

macro_rules! impl_scrolls {
    ($($ty:ty),*) => {
        $(impl Scrolls for $ty {
            fn shift(&mut self, dx: i32, dy: i32) {
                self.x += dx;
                self.y += dy;
            }
        })*
    };
}

impl_scrolls!(Creature, Hazard, Treasure, StaticBlock);

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> PlayerCharacter {
        PlayerCharacter::new("Mona", 100, 4, 20, 5)
    }

    #[test]
    fn jump_needs_ground_and_fresh_press() {
        let mut p = player();
        assert!(!p.jump(2, 20));
        assert_eq!(p.status, Status::Ground);

        assert!(p.jump(1, 20));
        assert_eq!(p.status, Status::Jump);
        assert_eq!(p.y_velo, -20);

        // Airborne: no second impulse.
        assert!(!p.jump(1, 20));
        assert_eq!(p.y_velo, -20);
    }

    #[test]
    fn death_costs_a_life() {
        let mut p = player();
        p.death();
        assert_eq!(p.hp_current, 0);
        assert_eq!(p.lives, 3);
        assert_eq!(p.status, Status::Dying);
        assert!(!p.is_alive());
    }

    #[test]
    fn enter_level_resets_view_and_hp() {
        let mut p = player();
        p.death();
        p.enter_level(20, 380, 600, 20);
        assert_eq!(p.view, Viewport::new(0, -120));
        assert_eq!(p.hp_current, 100);
        assert_eq!(p.status, Status::Ground);
        assert_eq!(p.lives, 3);
    }

    #[test]
    fn treasure_table_lookup() {
        let gem = Treasure::new(3, 0, 0, 0).unwrap();
        assert!(gem.kind.key_item);
        assert_eq!(gem.kind.value, 0);
        let ball = Treasure::new(4, 0, 0, 0).unwrap();
        assert_eq!(ball.kind.value, 10);
        assert_eq!(ball.bounds(), Rect::new(5, 5, 40, 40));
        assert!(Treasure::new(9, 0, 0, 0).is_none());
    }

    #[test]
    fn facing_offsets() {
        assert_eq!(Facing::from_roll(0), Facing::Left);
        assert_eq!(Facing::from_roll(1), Facing::Right);
        assert_eq!(Facing::Right.offset(), FACING_UNIT);
        assert_eq!(Facing::Left.sign(), -1);
    }

    #[test]
    fn avatar_world_position() {
        let a = WorldAvatar::default();
        assert_eq!(a.world_position(), (600, 800));
    }
}
