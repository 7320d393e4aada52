/// Session: everything that outlives a single scene.
///
/// Scenes own their transient state (menus, the play field); the session
/// owns the player, the overworld avatar, level templates, score, the tick
/// count and the creature RNG, and is passed by reference to every update
/// and draw.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::GameConfig;
use crate::domain::entity::{PlayerCharacter, WorldAvatar};
use crate::domain::level::LevelLayout;
use crate::domain::movement::WorldBounds;
use super::step::Tuning;

/// One-line message shown over the current scene for a while.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub ticks_left: u32,
}

pub struct Session {
    pub config: GameConfig,
    pub tuning: Tuning,
    pub player: PlayerCharacter,
    pub avatar: WorldAvatar,
    pub world: WorldBounds,
    /// Levels as loaded; never modified.
    pub templates: Vec<LevelLayout>,
    /// This game's copy, carrying completion flags.
    pub levels: Vec<LevelLayout>,
    pub score: u32,
    pub count: u64,
    pub rng: SmallRng,
    pub notice: Option<Notice>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.creatures.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Session {
            tuning: Tuning { physics: config.physics, creatures: config.creatures },
            player: fresh_player(&config),
            avatar: WorldAvatar::default(),
            world: WorldBounds::default(),
            templates: Vec::new(),
            levels: Vec::new(),
            score: 0,
            count: 0,
            rng,
            notice: None,
            config,
        }
    }

    pub fn set_levels(&mut self, levels: Vec<LevelLayout>) {
        self.levels = levels.clone();
        self.templates = levels;
    }

    /// Fresh player, avatar and level progress.
    pub fn new_game(&mut self) {
        self.player = fresh_player(&self.config);
        self.avatar = WorldAvatar::default();
        self.levels = self.templates.clone();
        self.score = 0;
        self.count = 0;
        info!(name = %self.player.name, "new game");
    }

    /// Advance the session clock and age the notice.
    pub fn tick(&mut self) {
        self.count += 1;
        if let Some(notice) = &mut self.notice {
            notice.ticks_left = notice.ticks_left.saturating_sub(1);
            if notice.ticks_left == 0 {
                self.notice = None;
            }
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.notice = Some(Notice { text, ticks_left: self.config.speed.banner_ticks.max(1) });
    }

    pub fn levels_completed(&self) -> usize {
        self.levels.iter().filter(|l| l.complete).count()
    }
}

fn fresh_player(config: &GameConfig) -> PlayerCharacter {
    PlayerCharacter::new(
        &config.character_name,
        config.hp,
        config.lives,
        config.physics.gravity,
        config.physics.run_speed,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::level::tests::layout_with;

    /// Seeded session with two small levels.
    pub(crate) fn session() -> Session {
        let mut config = GameConfig::default();
        config.creatures.seed = Some(11);
        let mut s = Session::new(config);
        let mut terrain = vec![0; 192];
        terrain[176..192].fill(1);
        let mut second = layout_with(vec![terrain.clone(), vec![0; 192]]);
        second.name = "Second".to_string();
        second.world_x = 600;
        s.set_levels(vec![layout_with(vec![terrain, vec![0; 192]]), second]);
        s
    }

    #[test]
    fn new_game_resets_progress() {
        let mut s = session();
        s.score = 50;
        s.levels[0].complete = true;
        s.player.lives = 1;
        s.new_game();
        assert_eq!(s.score, 0);
        assert_eq!(s.player.lives, 4);
        assert_eq!(s.levels_completed(), 0);
        assert!(!s.templates[0].complete);
    }

    #[test]
    fn notice_expires() {
        let mut s = session();
        s.config.speed.banner_ticks = 2;
        s.notify("Game saved");
        s.tick();
        assert!(s.notice.is_some());
        s.tick();
        assert!(s.notice.is_none());
        assert_eq!(s.count, 2);
        s.notify("");
        assert!(s.notice.is_none());
    }
}
