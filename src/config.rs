/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or
/// `~/.local/share/gooalley`. Falls back to sensible defaults if the file
/// is missing, incomplete or malformed.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, warn};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub physics: PhysicsConfig,
    pub creatures: CreatureConfig,
    pub gamepad: GamepadConfig,
    pub levels_file: PathBuf,
    pub saves_dir: PathBuf,
    pub character_name: String,
    pub hp: i32,
    pub lives: i32,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub load_ticks: u32,  // splash screen before Title
    pub dying_ticks: u32, // death sequence before World / game over
    pub banner_ticks: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PhysicsConfig {
    pub gravity: i32, // terminal velocity, also the jump impulse
    pub run_speed: i32,
    pub fixer_step: i32,
    pub scroll_band_y: i32,
}

#[derive(Clone, Copy, Debug)]
pub struct CreatureConfig {
    pub wander_step: i32,
    pub charge_step: i32,
    pub aggro_range: i32,
    pub seed: Option<u64>,
}

/// Button names per intent, e.g. `["A", "Start"]`.
#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
    pub pause: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    creatures: TomlCreatures,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_load_ticks")]
    load_ticks: u32,
    #[serde(default = "default_dying_ticks")]
    dying_ticks: u32,
    #[serde(default = "default_banner_ticks")]
    banner_ticks: u32,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: i32,
    #[serde(default = "default_run_speed")]
    run_speed: i32,
    #[serde(default = "default_fixer_step")]
    fixer_step: i32,
    #[serde(default = "default_scroll_band")]
    scroll_band_y: i32,
}

#[derive(Deserialize, Debug)]
struct TomlCreatures {
    #[serde(default = "default_wander_step")]
    wander_step: i32,
    #[serde(default = "default_charge_step")]
    charge_step: i32,
    #[serde(default = "default_aggro_range")]
    aggro_range: i32,
    #[serde(default)]
    seed: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pad_cancel")]
    cancel: Vec<String>,
    #[serde(default = "default_pad_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_file")]
    levels_file: String,
    #[serde(default = "default_saves_dir")]
    saves_dir: String,
    #[serde(default = "default_character_name")]
    character_name: String,
    #[serde(default = "default_hp")]
    hp: i32,
    #[serde(default = "default_lives")]
    lives: i32,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }      // ~60 ticks per second
fn default_load_ticks() -> u32 { 200 }
fn default_dying_ticks() -> u32 { 30 }
fn default_banner_ticks() -> u32 { 120 }

fn default_gravity() -> i32 { 20 }
fn default_run_speed() -> i32 { 5 }
fn default_fixer_step() -> i32 { 3 }
fn default_scroll_band() -> i32 { 160 }

fn default_wander_step() -> i32 { 3 }
fn default_charge_step() -> i32 { 10 }
fn default_aggro_range() -> i32 { 150 }

fn default_pad_jump() -> Vec<String> { vec!["A".into(), "B".into()] }
fn default_pad_confirm() -> Vec<String> { vec!["X".into(), "Start".into()] }
fn default_pad_cancel() -> Vec<String> { vec!["Y".into(), "Select".into()] }
fn default_pad_pause() -> Vec<String> { vec!["Start".into()] }

fn default_levels_file() -> String { "levels.json".into() }
fn default_saves_dir() -> String { "saves".into() }
fn default_character_name() -> String { "Mona".into() }
fn default_hp() -> i32 { 100 }
fn default_lives() -> i32 { 4 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            load_ticks: default_load_ticks(),
            dying_ticks: default_dying_ticks(),
            banner_ticks: default_banner_ticks(),
        }
    }
}

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            run_speed: default_run_speed(),
            fixer_step: default_fixer_step(),
            scroll_band_y: default_scroll_band(),
        }
    }
}

impl Default for TomlCreatures {
    fn default() -> Self {
        TomlCreatures {
            wander_step: default_wander_step(),
            charge_step: default_charge_step(),
            aggro_range: default_aggro_range(),
            seed: None,
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            confirm: default_pad_confirm(),
            cancel: default_pad_cancel(),
            pause: default_pad_pause(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_file: default_levels_file(),
            saves_dir: default_saves_dir(),
            character_name: default_character_name(),
            hp: default_hp(),
            lives: default_lives(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) XDG data home. Missing file or missing keys fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let general = toml_cfg.general;
        let levels_file = resolve_path(&general.levels_file, search_dirs, |p| p.is_file());
        let saves_dir = resolve_path(&general.saves_dir, search_dirs, |p| p.is_dir());

        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms.max(1),
                load_ticks: toml_cfg.speed.load_ticks,
                dying_ticks: toml_cfg.speed.dying_ticks,
                banner_ticks: toml_cfg.speed.banner_ticks,
            },
            physics: PhysicsConfig {
                gravity: toml_cfg.physics.gravity.max(1),
                run_speed: toml_cfg.physics.run_speed.max(1),
                fixer_step: toml_cfg.physics.fixer_step.max(1),
                scroll_band_y: toml_cfg.physics.scroll_band_y,
            },
            creatures: CreatureConfig {
                wander_step: toml_cfg.creatures.wander_step.max(1),
                charge_step: toml_cfg.creatures.charge_step.max(1),
                aggro_range: toml_cfg.creatures.aggro_range,
                seed: toml_cfg.creatures.seed,
            },
            gamepad: GamepadConfig {
                jump: toml_cfg.gamepad.jump,
                confirm: toml_cfg.gamepad.confirm,
                cancel: toml_cfg.gamepad.cancel,
                pause: toml_cfg.gamepad.pause,
            },
            levels_file,
            saves_dir,
            character_name: general.character_name,
            hp: general.hp.max(1),
            lives: general.lives.max(1),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &[])
    }
}

/// Absolute paths pass through; relative ones resolve against the first
/// candidate dir where `exists` holds, else stay CWD-relative.
fn resolve_path(raw: &str, search_dirs: &[PathBuf], exists: impl Fn(&PathBuf) -> bool) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(raw))
        .find(|p| exists(p))
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD + XDG data (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/gooalley)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gooalley");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => {
                        debug!(path = %path.display(), "loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        warn!(path = %path.display(), "config.toml parse error, using defaults: {e}");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GameConfig {
        let cfg: TomlConfig = toml::from_str(text).unwrap();
        GameConfig::from_toml(cfg, &[])
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.speed.tick_rate_ms, 16);
        assert_eq!(cfg.speed.dying_ticks, 30);
        assert_eq!(cfg.physics.gravity, 20);
        assert_eq!(cfg.physics.scroll_band_y, 160);
        assert_eq!(cfg.creatures.aggro_range, 150);
        assert_eq!(cfg.creatures.seed, None);
        assert_eq!(cfg.character_name, "Mona");
        assert_eq!(cfg.lives, 4);
        assert_eq!(cfg.saves_dir, PathBuf::from("saves"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = parse("[physics]\nrun_speed = 7\n\n[creatures]\nseed = 42\n");
        assert_eq!(cfg.physics.run_speed, 7);
        assert_eq!(cfg.physics.gravity, 20);
        assert_eq!(cfg.creatures.seed, Some(42));
        assert_eq!(cfg.creatures.charge_step, 10);
        assert_eq!(cfg.gamepad.pause, vec!["Start".to_string()]);
    }

    #[test]
    fn gamepad_buttons_override_per_intent() {
        let cfg = parse("[gamepad]\njump = [\"R1\"]\n");
        assert_eq!(cfg.gamepad.jump, vec!["R1".to_string()]);
        assert_eq!(cfg.gamepad.confirm, vec!["X".to_string(), "Start".to_string()]);
    }

    #[test]
    fn nonsense_values_are_floored() {
        let cfg = parse("[speed]\ntick_rate_ms = 0\n[general]\nlives = -3\n");
        assert_eq!(cfg.speed.tick_rate_ms, 1);
        assert_eq!(cfg.lives, 1);
    }

    #[test]
    fn motion_steps_are_floored() {
        let cfg = parse(
            "[physics]\nrun_speed = -5\nfixer_step = 0\n[creatures]\nwander_step = -3\ncharge_step = 0\n",
        );
        assert_eq!(cfg.physics.run_speed, 1);
        assert_eq!(cfg.physics.fixer_step, 1);
        assert_eq!(cfg.creatures.wander_step, 1);
        assert_eq!(cfg.creatures.charge_step, 1);
    }

    #[test]
    fn relative_paths_resolve_against_existing_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("levels.json"), "[]").unwrap();
        let dirs = vec![PathBuf::from("/nonexistent-gooalley"), dir.path().to_path_buf()];
        let found = resolve_path("levels.json", &dirs, |p| p.is_file());
        assert_eq!(found, dir.path().join("levels.json"));
        let missing = resolve_path("other.json", &dirs, |p| p.is_file());
        assert_eq!(missing, PathBuf::from("other.json"));
    }
}
