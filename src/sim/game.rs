/// Game: the current scene plus the session it runs against.
///
/// One `update` per tick. The scene is taken out, updated by value, and
/// whatever it returns is put back.

use tracing::info;

use crate::domain::input::FrameInput;
use crate::error::GameResult;
use super::draw;
use super::scene::{LoadScene, Scene, Transition};
use super::session::Session;
use super::surface::{SpriteSheet, Surface};

pub struct Game {
    scene: Scene,
    pub session: Session,
    sheet: SpriteSheet,
}

impl Game {
    pub fn new(session: Session) -> Self {
        Game { scene: Scene::Load(LoadScene::default()), session, sheet: SpriteSheet }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Advance one tick. `Ok(false)` means the player asked to quit.
    pub fn update(&mut self, input: &FrameInput) -> GameResult<bool> {
        self.session.tick();
        let current = std::mem::replace(&mut self.scene, Scene::Load(LoadScene::default()));
        let from = current.name();
        match current.update(&mut self.session, input)? {
            Transition::Continue(next) => {
                if next.name() != from {
                    info!(from, to = next.name(), "scene change");
                }
                self.scene = next;
                Ok(true)
            }
            Transition::Terminate => {
                info!(from, "quit requested");
                Ok(false)
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        draw::draw(surface, &self.scene, &self.session, &self.sheet);
    }
}
