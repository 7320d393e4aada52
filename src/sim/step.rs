/// The step function: advances a level in play by one tick.
///
/// Processing order:
///   1. Animation frames
///   2. Run (horizontal stride + leading-edge collision)
///   3. Jump impulse
///   4. Vertical integration + landing snap
///   5. Gravity fixer (anti-float nudge)
///   6. Status from the feet probe
///   7. Creature sense + think
///   8. Pickups (corner tiles)
///   9. Lethal contact (box overlap)
///  10. Exit check
///
/// Anything that moves the camera goes through `PlayField::pan`, so the
/// player's view and the live entities never drift apart.

use rand::Rng;
use tracing::{debug, info};

use crate::config::{CreatureConfig, PhysicsConfig};
use crate::domain::ai::{self, AiParams};
use crate::domain::entity::{Facing, PlayerCharacter, Status, TreasureKind, PLAYER_REST_FRAME};
use crate::domain::input::{FrameInput, Intent};
use crate::domain::movement::{self, Stride};
use crate::domain::physics;
use crate::domain::tile::SPAWN_LAYER;
use super::event::GameEvent;
use super::field::{PlayField, FRAME_TICKS};

/// Player run-cycle length.
const RUN_FRAMES: u64 = 12;

/// Knobs the step reads, copied out of the config once per session.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    pub physics: PhysicsConfig,
    pub creatures: CreatureConfig,
}

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step<R: Rng + ?Sized>(
    field: &mut PlayField,
    player: &mut PlayerCharacter,
    input: &FrameInput,
    tuning: &Tuning,
    count: u64,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !player.is_alive() {
        return events;
    }
    let phys = &tuning.physics;

    resolve_animation(field, player, input, count);
    resolve_run(field, player, input);
    resolve_jump(player, input, phys, &mut events);
    resolve_vertical(field, player, phys);
    resolve_gravity_fixer(field, player, phys);
    resolve_status(field, player, phys, &mut events);
    resolve_creatures(field, player, &tuning.creatures, rng, &mut events);
    resolve_pickups(field, player, &mut events);
    if resolve_contact(field, player, &mut events) {
        return events;
    }
    resolve_exit(field, player, &mut events);

    events
}

// ══════════════════════════════════════════════════════════════
// Animation
// ══════════════════════════════════════════════════════════════

fn resolve_animation(field: &mut PlayField, player: &mut PlayerCharacter, input: &FrameInput, count: u64) {
    field.animate(count);
    if input.pressed(Intent::Left) || input.pressed(Intent::Right) {
        player.frame = ((count / FRAME_TICKS) % RUN_FRAMES) as u32;
    } else if input.just_released(Intent::Left) || input.just_released(Intent::Right) {
        player.frame = PLAYER_REST_FRAME;
    }
}

// ══════════════════════════════════════════════════════════════
// Horizontal
// ══════════════════════════════════════════════════════════════

/// Each held direction strides once. A stride that lands the leading edge
/// in a solid tile is undone, whichever of body or camera took it.
fn resolve_run(field: &mut PlayField, player: &mut PlayerCharacter, input: &FrameInput) {
    for (intent, facing) in [(Intent::Right, Facing::Right), (Intent::Left, Facing::Left)] {
        if !input.pressed(intent) {
            continue;
        }
        player.facing = facing;
        match movement::run_stride(facing, player.x, &player.view, &field.rails, player.x_speed) {
            Stride::Body(dx) => {
                player.x += dx;
                if physics::leading_edge_blocked(&field.grid, &player.view, player.x, player.y, facing) {
                    player.x -= dx;
                }
            }
            Stride::Pan(dx) => {
                // Pans are undone too; otherwise the level scrolls through walls.
                let (applied, _) = field.pan(&mut player.view, dx, 0);
                if physics::leading_edge_blocked(&field.grid, &player.view, player.x, player.y, facing) {
                    field.pan(&mut player.view, -applied, 0);
                }
            }
            Stride::Still => {}
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Vertical
// ══════════════════════════════════════════════════════════════

fn resolve_jump(player: &mut PlayerCharacter, input: &FrameInput, phys: &PhysicsConfig, events: &mut Vec<GameEvent>) {
    if input.pressed(Intent::Jump) && player.jump(input.held_duration(Intent::Jump), phys.gravity) {
        events.push(GameEvent::Jumped);
    }
}

/// Integrate velocity until it reaches terminal; the terminal value
/// itself means "not airborne" and skips integration.
fn resolve_vertical(field: &mut PlayField, player: &mut PlayerCharacter, phys: &PhysicsConfig) {
    if player.y_velo >= phys.gravity {
        return;
    }
    let velo = player.y_velo;
    if physics::vertical_pans(player.y, velo, &player.view, &field.rails, phys.scroll_band_y) {
        let (_, applied) = field.pan(&mut player.view, 0, -velo);
        // Whatever the rails refused goes to the body.
        player.y += velo + applied;
    } else {
        player.y += velo;
    }
    player.y_velo += 1;

    if player.y_velo >= 0 {
        if let Some(snap) = physics::landing_y(&field.grid, &player.view, player.x, player.y) {
            player.y = snap;
            player.y_velo = phys.gravity;
            player.status = Status::Ground;
        }
    }
}

fn resolve_gravity_fixer(field: &mut PlayField, player: &mut PlayerCharacter, phys: &PhysicsConfig) {
    if player.status == Status::Ground
        || physics::feet_supported(&field.grid, &player.view, player.x, player.y)
    {
        return;
    }
    if physics::fixer_pans(player.y, &player.view, &field.rails, phys.scroll_band_y) {
        let (_, applied) = field.pan(&mut player.view, 0, -phys.fixer_step);
        player.y += phys.fixer_step + applied;
    } else {
        player.y += phys.fixer_step;
    }
}

fn resolve_status(field: &PlayField, player: &mut PlayerCharacter, phys: &PhysicsConfig, events: &mut Vec<GameEvent>) {
    if physics::feet_supported(&field.grid, &player.view, player.x, player.y) {
        if player.status != Status::Ground {
            events.push(GameEvent::Landed);
        }
        player.status = Status::Ground;
    } else if player.y_velo == phys.gravity {
        player.status = Status::Fall;
    }
}

// ══════════════════════════════════════════════════════════════
// Creatures
// ══════════════════════════════════════════════════════════════

fn resolve_creatures<R: Rng + ?Sized>(
    field: &mut PlayField,
    player: &PlayerCharacter,
    cfg: &CreatureConfig,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let params = AiParams::for_level(field.grid.width(), cfg.wander_step, cfg.charge_step, cfg.aggro_range);
    let target = player.bounds();
    for (index, creature) in field.creatures.iter_mut().enumerate() {
        if ai::sense(creature, &target, &params) {
            debug!(index, "creature spotted player");
            events.push(GameEvent::CreatureSpotted { index });
        }
        ai::think(creature, player.view.x, &params, rng);
    }
}

// ══════════════════════════════════════════════════════════════
// Pickups, contact, exit
// ══════════════════════════════════════════════════════════════

/// Treasure under any body corner is taken from the live grid, so the
/// same cell can never pay out twice.
fn resolve_pickups(field: &mut PlayField, player: &PlayerCharacter, events: &mut Vec<GameEvent>) {
    for cell in physics::corner_cells(&field.grid, &player.view, player.x, player.y) {
        let Some(id) = field.grid.tile(SPAWN_LAYER, cell).treasure_id() else {
            continue;
        };
        field.grid.take(SPAWN_LAYER, cell);
        field.treasures.retain(|t| t.cell != cell);
        let Some(kind) = TreasureKind::lookup(id) else {
            continue;
        };
        info!(treasure = kind.name, value = kind.value, cell, "picked up");
        events.push(GameEvent::TreasureCollected { name: kind.name, value: kind.value, cell });
        if kind.key_item && !field.key_item {
            field.key_item = true;
            events.push(GameEvent::KeyItemAcquired);
        }
    }
}

/// Box overlap with any live hazard or creature kills. Returns true if
/// the player died this tick.
fn resolve_contact(field: &PlayField, player: &mut PlayerCharacter, events: &mut Vec<GameEvent>) -> bool {
    let body = player.bounds();
    let killer = field
        .hazards
        .iter()
        .find(|h| h.bounds().overlaps(&body))
        .map(|h| h.name)
        .or_else(|| {
            field
                .creatures
                .iter()
                .find(|c| c.bounds().overlaps(&body))
                .map(|c| c.name)
        });
    match killer {
        Some(by) => {
            player.death();
            info!(by, lives = player.lives, "player killed");
            events.push(GameEvent::PlayerKilled { by });
            true
        }
        None => false,
    }
}

fn resolve_exit(field: &mut PlayField, player: &PlayerCharacter, events: &mut Vec<GameEvent>) {
    if !field.key_item {
        return;
    }
    if player.bounds().overlaps(&field.exit_on_screen(&player.view)) {
        field.clear();
        events.push(GameEvent::LevelCleared);
    }
}
