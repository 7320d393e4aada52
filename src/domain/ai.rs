/// Creature AI: a per-tick wander / aggro / pause machine.
///
/// Priority order, first match wins:
///   1. **Wander** (`wander_ctr > 0`): walk `wander_step` toward facing.
///      Hitting a level edge clamps the creature and ends the walk.
///   2. **Aggro** (`sees_player`): charge `charge_step` toward facing.
///   3. **Pause** (`pause_ctr > 0`): idle; every 9th count re-roll facing.
///   4. **Re-roll**: draw fresh wander and pause durations and a facing.
///
/// The random source is a parameter, so a seeded RNG replays exactly.
///
/// Sight is assigned by `sense`: a creature sees the player when they
/// share a tile row band and the horizontal gap between centers is within
/// `aggro_range`. Spotting the player interrupts wandering and pausing and
/// turns the creature toward them.

use rand::Rng;

use super::entity::{Creature, Facing};
use super::geometry::Rect;
use super::tile::TILE_SIZE;

/// Facing re-roll cadence while paused.
const PAUSE_REROLL_EVERY: u32 = 9;

#[derive(Clone, Copy, Debug)]
pub struct AiParams {
    pub wander_step: i32,
    pub charge_step: i32,
    pub aggro_range: i32,
    /// World-space x limits for the creature's left edge.
    pub min_x: i32,
    pub max_x: i32,
}

impl AiParams {
    /// Limits for a level `level_width` units wide.
    pub fn for_level(level_width: i32, wander_step: i32, charge_step: i32, aggro_range: i32) -> Self {
        AiParams {
            wander_step,
            charge_step,
            aggro_range,
            min_x: wander_step,
            max_x: level_width - TILE_SIZE - wander_step,
        }
    }
}

/// Update `sees_player` from the player's box. Returns true on the tick
/// the creature first spots the player.
pub fn sense(creature: &mut Creature, player: &Rect, params: &AiParams) -> bool {
    let body = creature.bounds();
    let center_x = (body.x0 + body.x1) / 2;
    let player_center_x = (player.x0 + player.x1) / 2;
    let same_band = (body.y0 - player.y0).abs() < TILE_SIZE;
    let gap = (player_center_x - center_x).abs();

    let was_seeing = creature.sees_player;
    creature.sees_player = same_band && gap <= params.aggro_range;
    if creature.sees_player {
        if player_center_x != center_x {
            creature.facing = if player_center_x > center_x { Facing::Right } else { Facing::Left };
        }
        if !was_seeing {
            creature.wander_ctr = 0;
            creature.pause_ctr = 0;
            return true;
        }
    }
    false
}

/// One tick of behavior. `view_x` converts the creature's screen x into
/// world space for the edge checks.
pub fn think<R: Rng + ?Sized>(creature: &mut Creature, view_x: i32, params: &AiParams, rng: &mut R) {
    if creature.wander_ctr > 0 {
        creature.wander_ctr -= 1;
        if !step_within(creature, view_x, params.wander_step, params) {
            creature.wander_ctr = 0;
        }
    } else if creature.sees_player {
        step_within(creature, view_x, params.charge_step, params);
    } else if creature.pause_ctr > 0 {
        if creature.pause_ctr % PAUSE_REROLL_EVERY == 0 {
            creature.facing = Facing::from_roll(rng.gen_range(0..2));
        }
        creature.pause_ctr -= 1;
    } else {
        creature.wander_ctr = rng.gen_range(20..70);
        creature.pause_ctr = rng.gen_range(20..60);
        creature.facing = Facing::from_roll(rng.gen_range(0..2));
    }
}

/// Move toward facing, clamped to the level. False when the edge was hit.
fn step_within(creature: &mut Creature, view_x: i32, step: i32, params: &AiParams) -> bool {
    let world_x = creature.x - view_x;
    let wanted = world_x + creature.facing.sign() * step;
    let clamped = wanted.clamp(params.min_x, params.max_x.max(params.min_x));
    creature.x = clamped + view_x;
    clamped == wanted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn params() -> AiParams {
        AiParams::for_level(800, 3, 10, 150)
    }

    fn yorp(x: i32, y: i32) -> Creature {
        Creature::new("teen yorp", x, y, 100, 100)
    }

    #[test]
    fn idle_creature_rerolls_reproducibly() {
        let mut a = yorp(300, 380);
        let mut b = yorp(300, 380);
        let mut rng_a = SmallRng::seed_from_u64(7);
        let mut rng_b = SmallRng::seed_from_u64(7);

        think(&mut a, 0, &params(), &mut rng_a);
        think(&mut b, 0, &params(), &mut rng_b);

        assert!(a.wander_ctr > 0);
        assert!(a.pause_ctr > 0);
        assert!(matches!(a.facing.offset(), 0 | 50));
        assert_eq!((a.wander_ctr, a.pause_ctr, a.facing), (b.wander_ctr, b.pause_ctr, b.facing));
        // Re-roll tick does not move.
        assert_eq!(a.x, 300);
    }

    #[test]
    fn wander_steps_toward_facing() {
        let mut c = yorp(300, 380);
        c.wander_ctr = 5;
        c.facing = Facing::Left;
        think(&mut c, 0, &params(), &mut SmallRng::seed_from_u64(1));
        assert_eq!(c.x, 297);
        assert_eq!(c.wander_ctr, 4);
    }

    #[test]
    fn wander_stops_at_level_edge() {
        let mut c = yorp(4, 380);
        c.wander_ctr = 10;
        c.facing = Facing::Left;
        let p = params();
        think(&mut c, 0, &p, &mut SmallRng::seed_from_u64(1));
        assert_eq!(c.x, p.min_x);
        assert_eq!(c.wander_ctr, 0);

        // Right edge with the camera panned: world x = screen x + 200.
        let mut c = yorp(p.max_x - 200 - 1, 380);
        c.wander_ctr = 10;
        c.facing = Facing::Right;
        think(&mut c, -200, &p, &mut SmallRng::seed_from_u64(1));
        assert_eq!(c.x - -200, p.max_x);
        assert_eq!(c.wander_ctr, 0);
    }

    #[test]
    fn aggro_charges_faster() {
        let mut c = yorp(300, 380);
        c.sees_player = true;
        c.facing = Facing::Right;
        think(&mut c, 0, &params(), &mut SmallRng::seed_from_u64(1));
        assert_eq!(c.x, 310);
    }

    #[test]
    fn pause_rerolls_every_ninth_count() {
        let mut c = yorp(300, 380);
        c.pause_ctr = 10;
        let mut rng = SmallRng::seed_from_u64(3);
        think(&mut c, 0, &params(), &mut rng);
        assert_eq!(c.pause_ctr, 9);
        assert_eq!(c.x, 300);
        think(&mut c, 0, &params(), &mut rng);
        assert_eq!(c.pause_ctr, 8);
    }

    #[test]
    fn sense_spots_player_in_band_and_range() {
        let p = params();
        let mut c = yorp(300, 380);
        c.wander_ctr = 30;
        let near = Rect::new(400, 383, 48, 48);
        assert!(sense(&mut c, &near, &p));
        assert!(c.sees_player);
        assert_eq!(c.facing, Facing::Right);
        assert_eq!(c.wander_ctr, 0);
        // Still seeing: no second rising edge.
        assert!(!sense(&mut c, &near, &p));

        let far = Rect::new(600, 383, 48, 48);
        sense(&mut c, &far, &p);
        assert!(!c.sees_player);

        let above = Rect::new(320, 280, 48, 48);
        sense(&mut c, &above, &p);
        assert!(!c.sees_player);
    }
}
