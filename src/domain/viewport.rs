/// Camera offset between world and screen space.
///
/// `screen = world + offset`. Offsets are always <= 0: panning toward the
/// far edge of a level makes `x` more negative. Rails bound the offset so
/// the screen never shows past the content edge.

pub const SCREEN_WIDTH: i32 = 600;
pub const SCREEN_HEIGHT: i32 = 480;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport { x: 0, y: SCREEN_HEIGHT }
    }
}

impl Viewport {
    pub fn new(x: i32, y: i32) -> Self {
        Viewport { x, y }
    }

    /// Show the bottom-left corner of content `height` units tall.
    pub fn bottom_left(height: i32) -> Self {
        Viewport { x: 0, y: (SCREEN_HEIGHT - height).min(0) }
    }

    pub fn to_world(&self, screen_x: i32, screen_y: i32) -> (i32, i32) {
        (screen_x - self.x, screen_y - self.y)
    }

    pub fn to_screen(&self, world_x: i32, world_y: i32) -> (i32, i32) {
        (world_x + self.x, world_y + self.y)
    }
}

/// Lowest permitted offsets; the highest is always 0.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Rails {
    pub min_x: i32,
    pub min_y: i32,
}

impl Rails {
    /// Rails for content of the given world extent.
    pub fn for_content(width: i32, height: i32) -> Self {
        Rails {
            min_x: (SCREEN_WIDTH - width).min(0),
            min_y: (SCREEN_HEIGHT - height).min(0),
        }
    }

    /// Shrink a requested pan so the offset stays on the rails.
    pub fn clamp_pan(&self, view: &Viewport, dx: i32, dy: i32) -> (i32, i32) {
        let x = (view.x + dx).clamp(self.min_x, 0) - view.x;
        let y = (view.y + dy).clamp(self.min_y, 0) - view.y;
        (x, y)
    }

    #[allow(dead_code)]
    pub fn contains(&self, view: &Viewport) -> bool {
        (self.min_x..=0).contains(&view.x) && (self.min_y..=0).contains(&view.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rails_for_standard_level() {
        let rails = Rails::for_content(800, 600);
        assert_eq!(rails, Rails { min_x: -200, min_y: -120 });
        let narrow = Rails::for_content(400, 300);
        assert_eq!(narrow, Rails { min_x: 0, min_y: 0 });
    }

    #[test]
    fn bottom_left_view_for_level() {
        let v = Viewport::bottom_left(600);
        assert_eq!(v, Viewport::new(0, -120));
        assert_eq!(v.to_world(20, 380), (20, 500));
        assert_eq!(v.to_screen(20, 500), (20, 380));
    }

    #[test]
    fn pans_stop_exactly_on_rails() {
        let rails = Rails::for_content(800, 600);
        let v = Viewport::new(-198, -118);
        assert_eq!(rails.clamp_pan(&v, -5, -5), (-2, -2));
        assert_eq!(rails.clamp_pan(&Viewport::new(-3, 0), 5, 0), (3, 0));
        assert!(rails.contains(&Viewport::new(-200, -120)));
        assert!(!rails.contains(&Viewport::new(-201, 0)));
    }
}
