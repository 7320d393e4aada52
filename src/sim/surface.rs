/// Drawing surface seen by the scenes.
///
/// Scenes draw into a 600×480 logical space through `Surface` and never
/// know what is behind it. Sprites are opaque handles: an id plus a source
/// rectangle on that id's sheet. Cutting animation frames is done with
/// `Sprite::sub_image`, which never reaches outside the sheet.

use crate::domain::geometry::Rect;

/// Logical width of one text character.
pub const GLYPH_WIDTH: i32 = 10;
pub const LINE_HEIGHT: i32 = 20;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum SpriteId {
    Splash,
    WorldMap,
    LevelIcon,
    LevelIconDone,
    Avatar,
    Player,
    Brick,
    Block,
    Portal,
    PortalGem,
    ShinyBall,
    Blob,
    Yorp,
    MessageBox,
    StatsBox,
    GameOver,
    LifeIcon,
    GemSlot,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sprite {
    id: SpriteId,
    src: Rect,
}

impl Sprite {
    pub fn id(&self) -> SpriteId {
        self.id
    }

    /// Region of the sheet this sprite shows.
    pub fn source(&self) -> Rect {
        self.src
    }

    pub fn width(&self) -> i32 {
        self.src.width()
    }

    pub fn height(&self) -> i32 {
        self.src.height()
    }

    /// Axis-aligned cut in sheet coordinates, clamped to this sprite.
    pub fn sub_image(&self, rect: Rect) -> Sprite {
        Sprite { id: self.id, src: self.src.intersect(&rect) }
    }

    /// Cell `(col, row)` of a uniform grid of `w`×`h` frames.
    pub fn frame(&self, col: u32, row_offset: i32, w: i32, h: i32) -> Sprite {
        self.sub_image(Rect::new(self.src.x0 + col as i32 * w, self.src.y0 + row_offset, w, h))
    }
}

/// Stable sizes of every sheet.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpriteSheet;

impl SpriteSheet {
    pub fn get(&self, id: SpriteId) -> Sprite {
        let (w, h) = match id {
            SpriteId::Splash | SpriteId::GameOver => (600, 480),
            SpriteId::WorldMap => (1000, 1000),
            SpriteId::LevelIcon | SpriteId::LevelIconDone => (150, 150),
            SpriteId::Avatar => (200, 50),
            SpriteId::Player => (576, 96),
            SpriteId::Brick | SpriteId::Block => (50, 50),
            SpriteId::Portal => (500, 150),
            SpriteId::PortalGem => (250, 50),
            SpriteId::ShinyBall => (280, 40),
            SpriteId::Blob => (500, 50),
            SpriteId::Yorp => (200, 100),
            SpriteId::MessageBox => (400, 200),
            SpriteId::StatsBox => (170, 60),
            SpriteId::LifeIcon => (20, 20),
            SpriteId::GemSlot => (70, 35),
        };
        Sprite { id, src: Rect::new(0, 0, w, h) }
    }
}

/// Flat fills.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Brush {
    Sky,
    Night,
    Shade,
    Panel,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TextStyle {
    Title,
    Normal,
    Highlight,
    Dim,
    Hud,
}

pub trait Surface {
    fn fill(&mut self, rect: Rect, brush: Brush);
    fn blit(&mut self, sprite: &Sprite, x: i32, y: i32);
    fn text(&mut self, text: &str, x: i32, y: i32, style: TextStyle);
}

/// Horizontally centered text on the logical screen.
pub fn text_centered(surface: &mut dyn Surface, text: &str, y: i32, style: TextStyle) {
    let width = text.chars().count() as i32 * GLYPH_WIDTH;
    surface.text(text, (crate::domain::viewport::SCREEN_WIDTH - width) / 2, y, style);
}
