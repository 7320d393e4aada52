/// Scene state machine.
///
/// ## Scenes
///   Load  → Title               splash timer expires, or skip
///   Title → World               New Game, or a save picked from Load Game
///   World → Pause(Message)      confirm held on an open level's hot-zone
///   Pause(Message) → Play       confirm
///   Play  → Pause(Resume)       pause; cancel/pause resumes
///   Play  → Pause(Dying)        lethal contact
///   Play  → World               exit reached holding the key item
///   Pause(Dying) → World        timer out, lives left
///   Pause(Dying) → Pause(Dead)  timer out, no lives left
///   Pause(Dead)  → Title        confirm
///   Title/World  → Info         How To Play, Credits, Stats
///
/// Each scene owns its own data and `update` consumes it, returning the
/// next scene by value. Nothing from a finished level survives into the
/// next scene except what the session keeps.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::domain::entity::{Heading, Status};
use crate::domain::input::{FrameInput, Intent};
use crate::domain::level::Narrative;
use crate::domain::menu::Menu;
use crate::domain::movement;
use crate::error::GameResult;
use super::draw::{format_message, MESSAGE_WIDTH};
use super::event::GameEvent;
use super::field::PlayField;
use super::level;
use super::save;
use super::session::Session;
use super::step;

pub const MAIN_MENU: [&str; 5] = ["New Game", "Load Game", "How To Play", "Credits", "Exit"];
pub const WORLD_MENU: [&str; 4] = ["Save", "Stats", "Main Menu", "Quit"];
const BACK_LABEL: &str = "Main Menu";

pub enum Scene {
    Load(LoadScene),
    Title(TitleScene),
    World(WorldScene),
    Play(PlayScene),
    Pause(PauseScene),
    Info(InfoScene),
}

/// Result of one scene update.
pub enum Transition {
    Continue(Scene),
    Terminate,
}

impl Scene {
    pub fn update(self, session: &mut Session, input: &FrameInput) -> GameResult<Transition> {
        match self {
            Scene::Load(s) => s.update(session, input),
            Scene::Title(s) => Ok(s.update(session, input)),
            Scene::World(s) => Ok(s.update(session, input)),
            Scene::Play(s) => Ok(s.update(session, input)),
            Scene::Pause(s) => Ok(s.update(session, input)),
            Scene::Info(s) => Ok(s.update(input)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scene::Load(_) => "load",
            Scene::Title(_) => "title",
            Scene::World(_) => "world",
            Scene::Play(_) => "play",
            Scene::Pause(p) => match p.mode {
                PauseMode::Message => "pause:message",
                PauseMode::Resume => "pause:resume",
                PauseMode::Dying { .. } => "pause:dying",
                PauseMode::Dead => "pause:dead",
            },
            Scene::Info(_) => "info",
        }
    }
}

fn stay(scene: Scene) -> Transition {
    Transition::Continue(scene)
}

/// What a selected menu label asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    NewGame,
    LoadGame,
    HowToPlay,
    Credits,
    Exit,
    Save,
    Stats,
    MainMenu,
    Quit,
    LoadSave(String),
    Unknown,
}

impl MenuAction {
    pub fn parse(label: &str) -> MenuAction {
        match label {
            "New Game" => MenuAction::NewGame,
            "Load Game" => MenuAction::LoadGame,
            "How To Play" => MenuAction::HowToPlay,
            "Credits" => MenuAction::Credits,
            "Exit" => MenuAction::Exit,
            "Save" => MenuAction::Save,
            "Stats" => MenuAction::Stats,
            "Main Menu" => MenuAction::MainMenu,
            "Quit" => MenuAction::Quit,
            other if other.ends_with(&format!(".{}", save::SAVE_EXT)) => MenuAction::LoadSave(other.to_string()),
            _ => MenuAction::Unknown,
        }
    }
}

/// Shared menu cursor handling. Returns the chosen action on confirm.
fn drive_menu(menu: &mut Menu, input: &FrameInput) -> Option<MenuAction> {
    if input.just_pressed(Intent::MenuNext) {
        menu.next();
    }
    if input.just_pressed(Intent::MenuPrev) {
        menu.prev();
    }
    if input.just_pressed(Intent::Confirm) {
        return menu.select().map(MenuAction::parse);
    }
    None
}

// ══════════════════════════════════════════════════════════════
// Load
// ══════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct LoadScene {
    pub elapsed: u32,
    loaded: bool,
}

impl LoadScene {
    /// Level data is read on the first tick; a bad file ends the game here.
    fn update(mut self, session: &mut Session, input: &FrameInput) -> GameResult<Transition> {
        if !self.loaded {
            let levels = level::load_levels(&session.config.levels_file)?;
            session.set_levels(levels);
            self.loaded = true;
        }
        self.elapsed += 1;
        if input.just_pressed(Intent::Skip) || self.elapsed > session.config.speed.load_ticks {
            return Ok(stay(Scene::Title(TitleScene::main())));
        }
        Ok(stay(Scene::Load(self)))
    }
}

// ══════════════════════════════════════════════════════════════
// Title
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TitleKind {
    Main,
    Saves,
}

pub struct TitleScene {
    pub header: &'static str,
    pub kind: TitleKind,
    pub menu: Menu,
}

impl TitleScene {
    pub fn main() -> Self {
        TitleScene { header: "Goo Alley", kind: TitleKind::Main, menu: Menu::new(MAIN_MENU) }
    }

    pub fn saves(names: Vec<String>) -> Self {
        let mut menu = Menu::new(names);
        menu.append(BACK_LABEL);
        TitleScene { header: "Load Game", kind: TitleKind::Saves, menu }
    }

    fn update(mut self, session: &mut Session, input: &FrameInput) -> Transition {
        if self.kind == TitleKind::Saves && input.just_pressed(Intent::Cancel) {
            return stay(Scene::Title(TitleScene::main()));
        }
        match drive_menu(&mut self.menu, input) {
            Some(action) => self.choose(action, session),
            None => stay(Scene::Title(self)),
        }
    }

    fn choose(self, action: MenuAction, session: &mut Session) -> Transition {
        match action {
            MenuAction::NewGame => {
                session.new_game();
                stay(Scene::World(WorldScene::default()))
            }
            MenuAction::LoadGame => match save::list(&session.config.saves_dir) {
                Ok(names) if names.is_empty() => {
                    session.notify("No saved games yet");
                    stay(Scene::Title(self))
                }
                Ok(names) => stay(Scene::Title(TitleScene::saves(names))),
                Err(e) => {
                    warn!(error = %e, "could not list saves");
                    session.notify("Could not read the saves folder");
                    stay(Scene::Title(self))
                }
            },
            MenuAction::LoadSave(file) => {
                let path: PathBuf = session.config.saves_dir.join(&file);
                match save::read(&path) {
                    Ok(data) => {
                        save::restore(session, &data);
                        stay(Scene::World(WorldScene::default()))
                    }
                    Err(e) => {
                        warn!(error = %e, "could not load save");
                        session.notify(format!("Could not load {file}"));
                        stay(Scene::Title(self))
                    }
                }
            }
            MenuAction::HowToPlay => stay(Scene::Info(InfoScene::how_to_play())),
            MenuAction::Credits => stay(Scene::Info(InfoScene::credits())),
            MenuAction::MainMenu => stay(Scene::Title(TitleScene::main())),
            MenuAction::Exit | MenuAction::Quit => Transition::Terminate,
            MenuAction::Save | MenuAction::Stats | MenuAction::Unknown => stay(Scene::Title(self)),
        }
    }
}

// ══════════════════════════════════════════════════════════════
// World
// ══════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct WorldScene {
    /// Open overlay menu, if any.
    pub menu: Option<Menu>,
}

impl WorldScene {
    fn update(mut self, session: &mut Session, input: &FrameInput) -> Transition {
        if let Some(menu) = &mut self.menu {
            if input.just_pressed(Intent::Cancel) {
                self.menu = None;
                return stay(Scene::World(self));
            }
            return match drive_menu(menu, input) {
                Some(action) => self.choose(action, session),
                None => stay(Scene::World(self)),
            };
        }

        if input.just_pressed(Intent::Cancel) {
            self.menu = Some(Menu::new(WORLD_MENU));
            return stay(Scene::World(self));
        }

        for (intent, heading) in [
            (Intent::Up, Heading::Up),
            (Intent::Down, Heading::Down),
            (Intent::Left, Heading::Left),
            (Intent::Right, Heading::Right),
        ] {
            if input.pressed(intent) {
                movement::navigate(&mut session.avatar, heading, &session.world);
            }
        }

        if input.pressed(Intent::Confirm) {
            if let Some(index) = level_under_avatar(session) {
                return enter_level(session, index);
            }
        }
        stay(Scene::World(self))
    }

    fn choose(mut self, action: MenuAction, session: &mut Session) -> Transition {
        match action {
            MenuAction::Save => {
                match save::write(&session.config.saves_dir, &save::capture(session)) {
                    Ok(_) => session.notify("Game saved"),
                    Err(e) => {
                        warn!(error = %e, "save failed");
                        session.notify("Save failed");
                    }
                }
                self.menu = None;
                stay(Scene::World(self))
            }
            MenuAction::Stats => stay(Scene::Info(InfoScene::stats(session))),
            MenuAction::MainMenu => stay(Scene::Title(TitleScene::main())),
            MenuAction::Quit | MenuAction::Exit => Transition::Terminate,
            _ => {
                self.menu = None;
                stay(Scene::World(self))
            }
        }
    }
}

/// First incomplete level whose hot-zone the avatar overlaps.
pub fn level_under_avatar(session: &Session) -> Option<usize> {
    let body = session.avatar.bounds();
    session
        .levels
        .iter()
        .position(|l| !l.complete && body.overlaps(&l.hot_zone(&session.avatar.view)))
}

/// Reset the player into a level and rebuild its live field.
fn enter_level(session: &mut Session, index: usize) -> Transition {
    let Some(layout) = session.levels.get(index) else {
        return stay(Scene::World(WorldScene::default()));
    };
    session.player.enter_level(
        layout.player_x,
        layout.player_y,
        layout.height(),
        session.tuning.physics.gravity,
    );
    let field = PlayField::setup(layout, &session.player.view);
    info!(level = %layout.name, "entering level");

    let play = PlayScene { level: index, field };
    let message = layout.message(Narrative::Enter);
    if message.is_empty() {
        stay(Scene::Play(play))
    } else {
        stay(Scene::Pause(PauseScene::new(play, PauseMode::Message, message)))
    }
}

// ══════════════════════════════════════════════════════════════
// Play
// ══════════════════════════════════════════════════════════════

pub struct PlayScene {
    pub level: usize,
    pub field: PlayField,
}

impl PlayScene {
    fn update(mut self, session: &mut Session, input: &FrameInput) -> Transition {
        if input.just_pressed(Intent::Pause) {
            return stay(Scene::Pause(PauseScene::new(self, PauseMode::Resume, "")));
        }

        let events = step::step(
            &mut self.field,
            &mut session.player,
            input,
            &session.tuning,
            session.count,
            &mut session.rng,
        );

        for event in &events {
            match event {
                GameEvent::TreasureCollected { value, .. } => session.score += value,
                GameEvent::PlayerKilled { .. } => {
                    let message = self.message(session, Narrative::Die);
                    let ticks_left = session.config.speed.dying_ticks;
                    return stay(Scene::Pause(PauseScene::new(self, PauseMode::Dying { ticks_left }, &message)));
                }
                GameEvent::LevelCleared => {
                    if let Some(level) = session.levels.get_mut(self.level) {
                        level.complete = true;
                        info!(level = %level.name, score = session.score, "level complete");
                    }
                    let message = self.message(session, Narrative::Complete);
                    session.notify(message);
                    return stay(Scene::World(WorldScene::default()));
                }
                _ => {}
            }
        }
        stay(Scene::Play(self))
    }

    fn message(&self, session: &Session, which: Narrative) -> String {
        session
            .levels
            .get(self.level)
            .map_or_else(String::new, |l| l.message(which).to_string())
    }
}

// ══════════════════════════════════════════════════════════════
// Pause
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PauseMode {
    /// Blocking message; confirm continues into play.
    Message,
    /// Player-requested pause.
    Resume,
    Dying { ticks_left: u32 },
    /// Out of lives.
    Dead,
}

pub struct PauseScene {
    pub play: PlayScene,
    pub mode: PauseMode,
    pub lines: Vec<String>,
}

impl PauseScene {
    pub fn new(play: PlayScene, mode: PauseMode, message: &str) -> Self {
        PauseScene { play, mode, lines: format_message(message, MESSAGE_WIDTH) }
    }

    fn update(mut self, session: &mut Session, input: &FrameInput) -> Transition {
        match self.mode {
            PauseMode::Message => {
                if input.just_pressed(Intent::Confirm) {
                    return stay(Scene::Play(self.play));
                }
            }
            PauseMode::Resume => {
                if input.just_pressed(Intent::Cancel) || input.just_pressed(Intent::Pause) {
                    return stay(Scene::Play(self.play));
                }
            }
            PauseMode::Dying { ticks_left } if ticks_left > 0 => {
                self.mode = PauseMode::Dying { ticks_left: ticks_left - 1 };
            }
            PauseMode::Dying { .. } => {
                if session.player.lives <= 0 {
                    session.player.status = Status::TotallyDead;
                    info!(score = session.score, "game over");
                    self.mode = PauseMode::Dead;
                } else {
                    self.play.field.clear();
                    return stay(Scene::World(WorldScene::default()));
                }
            }
            PauseMode::Dead => {
                if input.just_pressed(Intent::Confirm) {
                    self.play.field.clear();
                    session.player.status = Status::Ground;
                    return stay(Scene::Title(TitleScene::main()));
                }
            }
        }
        stay(Scene::Pause(self))
    }
}

// ══════════════════════════════════════════════════════════════
// Info
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InfoReturn {
    Title,
    World,
}

pub struct InfoScene {
    pub title: String,
    pub lines: Vec<String>,
    pub back: InfoReturn,
}

impl InfoScene {
    pub fn how_to_play() -> Self {
        InfoScene {
            title: "How To Play".to_string(),
            lines: vec![
                "Arrows or WASD walk the map and run.".to_string(),
                "Space jumps. Enter enters a level.".to_string(),
                "Grab the Portal Gem, then reach".to_string(),
                "the portal to clear the level.".to_string(),
                "Avoid blobs and teen yorps.".to_string(),
                "Esc opens the map menu, P pauses.".to_string(),
            ],
            back: InfoReturn::Title,
        }
    }

    pub fn credits() -> Self {
        InfoScene {
            title: "Acknowledgements".to_string(),
            lines: vec![
                "Design and code: the Goo Alley crew".to_string(),
                "Terminal front-end: crossterm".to_string(),
                "Thanks for playing!".to_string(),
            ],
            back: InfoReturn::Title,
        }
    }

    pub fn stats(session: &Session) -> Self {
        InfoScene {
            title: format!("{}'s Stats", session.player.name),
            lines: vec![
                format!("Lives: {}", session.player.lives),
                format!("Score: {}", session.score),
                format!("Levels: {} of {}", session.levels_completed(), session.levels.len()),
                format!("Time: {} ticks", session.count),
            ],
            back: InfoReturn::World,
        }
    }

    fn update(self, input: &FrameInput) -> Transition {
        if input.just_pressed(Intent::Confirm) || input.just_pressed(Intent::Cancel) {
            return match self.back {
                InfoReturn::Title => stay(Scene::Title(TitleScene::main())),
                InfoReturn::World => stay(Scene::World(WorldScene::default())),
            };
        }
        stay(Scene::Info(self))
    }
}
