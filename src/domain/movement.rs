/// Scroll-vs-entity movement decisions.
///
/// Both the side-scroller and the overworld split each step between the
/// body and the camera: the body walks freely while the camera sits on a
/// rail and the body is short of a dead-zone threshold; otherwise the
/// camera pans and the body stays put on screen. These functions only
/// decide; callers apply the result and run collision checks.

use super::entity::{Facing, Heading, WorldAvatar};
use super::viewport::{Rails, Viewport};

/// Screen x the body walks to before the camera takes over.
pub const RUN_MIDLINE: i32 = 290;
/// Rightmost screen x the body may reach with the camera on its far rail.
pub const RUN_FAR_LIMIT: i32 = 530;
/// Leftmost screen x the body may reach with the camera on its near rail.
pub const RUN_NEAR_LIMIT: i32 = 40;

/// Outcome of one horizontal step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stride {
    /// Move the body by dx.
    Body(i32),
    /// Pan the camera (and everything riding it) by dx.
    Pan(i32),
    Still,
}

/// Side-scroll three-branch rule for a run step toward `facing`.
pub fn run_stride(facing: Facing, x: i32, view: &Viewport, rails: &Rails, speed: i32) -> Stride {
    match facing {
        Facing::Right => {
            if view.x == 0 && x < RUN_MIDLINE {
                Stride::Body(speed)
            } else if view.x == rails.min_x && x < RUN_FAR_LIMIT {
                Stride::Body(speed)
            } else if view.x > rails.min_x {
                Stride::Pan(-speed.min(view.x - rails.min_x))
            } else {
                Stride::Still
            }
        }
        Facing::Left => {
            if view.x == rails.min_x && x > RUN_MIDLINE {
                Stride::Body(-speed)
            } else if view.x == 0 && x > RUN_NEAR_LIMIT {
                Stride::Body(-speed)
            } else if view.x < 0 {
                Stride::Pan(speed.min(-view.x))
            } else {
                Stride::Still
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Overworld
// ══════════════════════════════════════════════════════════════

/// Circular envelope the avatar may roam, plus the map's camera rails.
#[derive(Clone, Copy, Debug)]
pub struct WorldBounds {
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub radius: f64,
    pub rails: Rails,
}

impl Default for WorldBounds {
    fn default() -> Self {
        WorldBounds {
            anchor_x: 500,
            anchor_y: 500,
            radius: 375.0,
            rails: Rails { min_x: -400, min_y: -520 },
        }
    }
}

/// Screen thresholds for the avatar's dead zone.
const NAV_MID_X: i32 = 290;
const NAV_TOP_Y: i32 = 230;
const NAV_BOTTOM_Y: i32 = 250;
/// Extra reach checked when stepping right or down, where the avatar's
/// body extends past its anchor corner.
const NAV_REACH: f64 = 50.0;

impl WorldBounds {
    /// Distance from the avatar's world position to the anchor.
    pub fn radius_check(&self, avatar: &WorldAvatar) -> f64 {
        let (wx, wy) = avatar.world_position();
        f64::from(wx - self.anchor_x).hypot(f64::from(wy - self.anchor_y))
    }

    fn inside(&self, rc: f64, reach: f64) -> bool {
        rc + reach < self.radius
    }
}

/// One overworld step toward `heading`. Moves the avatar or pans its view.
pub fn navigate(avatar: &mut WorldAvatar, heading: Heading, bounds: &WorldBounds) {
    let rc = bounds.radius_check(avatar);
    let rails = bounds.rails;
    let speed = avatar.speed;
    let view = avatar.view;
    avatar.heading = heading;

    match heading {
        Heading::Right => {
            if (view.x == 0 && avatar.x < NAV_MID_X)
                || (view.x == rails.min_x && bounds.inside(rc, NAV_REACH))
            {
                avatar.x += speed;
            } else if view.x > rails.min_x {
                avatar.view.x -= speed.min(view.x - rails.min_x);
            }
        }
        Heading::Left => {
            if (view.x == rails.min_x && avatar.x > NAV_MID_X)
                || (view.x == 0 && bounds.inside(rc, 0.0))
            {
                avatar.x -= speed;
            } else if view.x < 0 {
                avatar.view.x += speed.min(-view.x);
            }
        }
        Heading::Up => {
            if (view.y == rails.min_y && avatar.y > NAV_TOP_Y)
                || (view.y == 0 && bounds.inside(rc, 0.0))
            {
                avatar.y -= speed;
            } else if view.y < 0 {
                avatar.view.y += speed.min(-view.y);
            }
        }
        Heading::Down => {
            if (view.y == 0 && avatar.y < NAV_BOTTOM_Y)
                || (view.y == rails.min_y && bounds.inside(rc, NAV_REACH))
            {
                avatar.y += speed;
            } else if view.y > rails.min_y {
                avatar.view.y -= speed.min(view.y - rails.min_y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_rails() -> Rails {
        Rails::for_content(800, 600)
    }

    #[test]
    fn run_right_walks_then_pans_then_walks() {
        let rails = level_rails();
        let near = Viewport::new(0, -120);
        assert_eq!(run_stride(Facing::Right, 100, &near, &rails, 5), Stride::Body(5));
        assert_eq!(run_stride(Facing::Right, 290, &near, &rails, 5), Stride::Pan(-5));
        let mid = Viewport::new(-198, -120);
        assert_eq!(run_stride(Facing::Right, 290, &mid, &rails, 5), Stride::Pan(-2));
        let far = Viewport::new(-200, -120);
        assert_eq!(run_stride(Facing::Right, 290, &far, &rails, 5), Stride::Body(5));
        assert_eq!(run_stride(Facing::Right, 530, &far, &rails, 5), Stride::Still);
    }

    #[test]
    fn run_left_mirrors() {
        let rails = level_rails();
        let far = Viewport::new(-200, -120);
        assert_eq!(run_stride(Facing::Left, 400, &far, &rails, 5), Stride::Body(-5));
        assert_eq!(run_stride(Facing::Left, 290, &far, &rails, 5), Stride::Pan(5));
        let near = Viewport::new(0, -120);
        assert_eq!(run_stride(Facing::Left, 100, &near, &rails, 5), Stride::Body(-5));
        assert_eq!(run_stride(Facing::Left, 40, &near, &rails, 5), Stride::Still);
    }

    #[test]
    fn narrow_level_never_pans() {
        let rails = Rails::for_content(600, 480);
        let view = Viewport::new(0, 0);
        assert_eq!(run_stride(Facing::Right, 400, &view, &rails, 5), Stride::Body(5));
        assert_eq!(run_stride(Facing::Right, 530, &view, &rails, 5), Stride::Still);
    }

    #[test]
    fn avatar_starts_inside_envelope() {
        let bounds = WorldBounds::default();
        let avatar = WorldAvatar::default();
        // World (600, 800) vs anchor (500, 500).
        let rc = bounds.radius_check(&avatar);
        assert!((rc - 100f64.hypot(300.0)).abs() < 1e-9);
        assert!(rc < bounds.radius);
    }

    #[test]
    fn navigation_pans_until_rail() {
        let bounds = WorldBounds::default();
        let mut avatar = WorldAvatar::default();
        avatar.view = Viewport::new(-398, -500);
        navigate(&mut avatar, Heading::Left, &bounds);
        // Not on a rail, so the view pans.
        assert_eq!(avatar.view.x, -393);
        assert_eq!(avatar.x, 200);
        assert_eq!(avatar.heading, Heading::Left);
    }

    #[test]
    fn envelope_stops_outward_walk() {
        let bounds = WorldBounds::default();
        let mut avatar = WorldAvatar::default();
        avatar.view = Viewport::new(-400, -520);
        // World x = 550 + 400 = 950, well outside the radius.
        avatar.x = 550;
        avatar.y = 300;
        navigate(&mut avatar, Heading::Right, &bounds);
        assert_eq!(avatar.x, 550);
        assert_eq!(avatar.view.x, -400);
    }

    #[test]
    fn repeated_navigation_stays_within_reach() {
        let bounds = WorldBounds::default();
        let mut avatar = WorldAvatar::default();
        for heading in [Heading::Right, Heading::Down, Heading::Left, Heading::Up] {
            for _ in 0..400 {
                navigate(&mut avatar, heading, &bounds);
                assert!(bounds.rails.contains(&avatar.view));
            }
        }
        assert!(bounds.radius_check(&avatar) < bounds.radius + 60.0);
    }
}
