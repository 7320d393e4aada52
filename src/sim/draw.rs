/// Scene drawing.
///
/// Everything is drawn back to front into a `Surface` in 600×480 logical
/// units. Nothing here mutates game state; a scene can be drawn any number
/// of times between updates.
///
/// ## Layers (play)
///   sky → bricks → blocks → portal → hazards → creatures → treasures →
///   player → HUD

use crate::domain::entity::{Facing, Heading, PLAYER_SIZE};
use crate::domain::geometry::Rect;
use crate::domain::level::{PORTAL_HEIGHT, PORTAL_WIDTH};
use crate::domain::menu::Menu;
use crate::domain::tile::{Tile, TileGrid, TERRAIN_LAYER, TILE_SIZE};
use crate::domain::viewport::{SCREEN_HEIGHT, SCREEN_WIDTH};
use super::field::PORTAL_FRAMES;
use super::scene::{InfoScene, PauseMode, PauseScene, PlayScene, Scene, TitleScene, WorldScene};
use super::session::Session;
use super::surface::{text_centered, Brush, SpriteId, SpriteSheet, Surface, TextStyle, LINE_HEIGHT};

/// Characters per line inside the message box.
pub const MESSAGE_WIDTH: usize = 20;

const MESSAGE_BOX: (i32, i32) = (100, 140);
const NOTICE_Y: i32 = 450;

fn screen() -> Rect {
    Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
}

pub fn draw(surface: &mut dyn Surface, scene: &Scene, session: &Session, sheet: &SpriteSheet) {
    match scene {
        Scene::Load(_) => draw_splash(surface, sheet),
        Scene::Title(title) => draw_title(surface, title, sheet),
        Scene::World(world) => draw_world(surface, world, session, sheet),
        Scene::Play(play) => draw_play(surface, play, session, sheet),
        Scene::Pause(pause) => draw_pause(surface, pause, session, sheet),
        Scene::Info(info) => draw_info(surface, info),
    }
    if let Some(notice) = &session.notice {
        text_centered(surface, &notice.text, NOTICE_Y, TextStyle::Hud);
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn format_message(message: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in message.split_whitespace() {
        let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ══════════════════════════════════════════════════════════════
// Menus and text screens
// ══════════════════════════════════════════════════════════════

fn draw_splash(surface: &mut dyn Surface, sheet: &SpriteSheet) {
    surface.fill(screen(), Brush::Night);
    surface.blit(&sheet.get(SpriteId::Splash), 0, 0);
    text_centered(surface, "Goo Alley", 200, TextStyle::Title);
    text_centered(surface, "press F to skip", 420, TextStyle::Dim);
}

fn draw_menu(surface: &mut dyn Surface, menu: &Menu, top: i32) {
    for (i, (label, active)) in menu.entries().enumerate() {
        let y = top + i as i32 * LINE_HEIGHT;
        if active {
            text_centered(surface, &format!("> {label} <"), y, TextStyle::Highlight);
        } else {
            text_centered(surface, label, y, TextStyle::Normal);
        }
    }
}

fn draw_title(surface: &mut dyn Surface, title: &TitleScene, sheet: &SpriteSheet) {
    surface.fill(screen(), Brush::Night);
    surface.blit(&sheet.get(SpriteId::Splash), 0, 0);
    text_centered(surface, title.header, 120, TextStyle::Title);
    draw_menu(surface, &title.menu, 200);
}

fn draw_info(surface: &mut dyn Surface, info: &InfoScene) {
    surface.fill(screen(), Brush::Night);
    text_centered(surface, &info.title, 80, TextStyle::Title);
    for (i, line) in info.lines.iter().enumerate() {
        text_centered(surface, line, 140 + i as i32 * LINE_HEIGHT, TextStyle::Normal);
    }
    text_centered(surface, "Enter to go back", 420, TextStyle::Dim);
}

fn draw_message_box(surface: &mut dyn Surface, lines: &[String], sheet: &SpriteSheet) {
    let (x, y) = MESSAGE_BOX;
    surface.blit(&sheet.get(SpriteId::MessageBox), x, y);
    for (i, line) in lines.iter().enumerate() {
        text_centered(surface, line, y + 30 + i as i32 * LINE_HEIGHT, TextStyle::Normal);
    }
}

// ══════════════════════════════════════════════════════════════
// Overworld
// ══════════════════════════════════════════════════════════════

fn draw_world(surface: &mut dyn Surface, world: &WorldScene, session: &Session, sheet: &SpriteSheet) {
    let avatar = &session.avatar;
    surface.fill(screen(), Brush::Night);
    surface.blit(&sheet.get(SpriteId::WorldMap), avatar.view.x, avatar.view.y);

    for level in &session.levels {
        let zone = level.hot_zone(&avatar.view);
        let icon = if level.complete { SpriteId::LevelIconDone } else { SpriteId::LevelIcon };
        surface.blit(&sheet.get(icon), zone.x0, zone.y0);
        surface.text(&level.name, zone.x0, zone.y1, TextStyle::Dim);
    }

    let col = match avatar.heading {
        Heading::Down => 0,
        Heading::Up => 1,
        Heading::Left => 2,
        Heading::Right => 3,
    };
    surface.blit(&sheet.get(SpriteId::Avatar).frame(col, 0, TILE_SIZE, TILE_SIZE), avatar.x, avatar.y);

    draw_hud(surface, session, false, sheet);

    if let Some(menu) = &world.menu {
        let (x, y) = MESSAGE_BOX;
        surface.blit(&sheet.get(SpriteId::MessageBox), x, y);
        draw_menu(surface, menu, y + 40);
    }
}

// ══════════════════════════════════════════════════════════════
// Level
// ══════════════════════════════════════════════════════════════

fn draw_play(surface: &mut dyn Surface, play: &PlayScene, session: &Session, sheet: &SpriteSheet) {
    let field = &play.field;
    let player = &session.player;
    let view = player.view;
    surface.fill(screen(), Brush::Sky);

    let brick = sheet.get(SpriteId::Brick);
    for (idx, code) in field.grid.occupied(TERRAIN_LAYER) {
        if Tile::from_code(code) != Tile::Solid {
            continue;
        }
        let (wx, wy) = TileGrid::origin_of(idx);
        let (x, y) = view.to_screen(wx, wy);
        if Rect::new(x, y, TILE_SIZE, TILE_SIZE).overlaps(&screen()) {
            surface.blit(&brick, x, y);
        }
    }

    let block = sheet.get(SpriteId::Block);
    for b in &field.blocks {
        surface.blit(&block, b.x, b.y);
    }

    if field.key_item {
        let exit = field.exit_on_screen(&view);
        let col = field.frame % PORTAL_FRAMES;
        surface.blit(
            &sheet.get(SpriteId::Portal).frame(col, 0, PORTAL_WIDTH, PORTAL_HEIGHT),
            exit.x0,
            exit.y0,
        );
    }

    let blob = sheet.get(SpriteId::Blob);
    for h in &field.hazards {
        surface.blit(&blob.frame(h.frame, 0, TILE_SIZE, TILE_SIZE), h.x, h.y);
    }

    let yorp = sheet.get(SpriteId::Yorp);
    for c in &field.creatures {
        surface.blit(&yorp.frame(field.frame, c.facing.offset(), TILE_SIZE, TILE_SIZE), c.x, c.y);
    }

    for t in &field.treasures {
        let id = if t.kind.key_item { SpriteId::PortalGem } else { SpriteId::ShinyBall };
        let at = t.bounds();
        surface.blit(&sheet.get(id).frame(t.frame, 0, t.kind.width, t.kind.height), at.x0, at.y0);
    }

    let row = match player.facing {
        Facing::Left => 0,
        Facing::Right => PLAYER_SIZE,
    };
    surface.blit(
        &sheet.get(SpriteId::Player).frame(player.frame, row, PLAYER_SIZE, PLAYER_SIZE),
        player.x,
        player.y,
    );

    draw_hud(surface, session, field.key_item, sheet);
}

/// Stats box: name, score, one icon per life, and the key-item slot.
fn draw_hud(surface: &mut dyn Surface, session: &Session, key_item: bool, sheet: &SpriteSheet) {
    surface.blit(&sheet.get(SpriteId::StatsBox), 10, 10);
    surface.text(&session.player.name, 20, 14, TextStyle::Hud);
    surface.text(&format!("Score {}", session.score), 20, 34, TextStyle::Hud);

    let life = sheet.get(SpriteId::LifeIcon);
    for i in 0..session.player.lives.max(0) {
        surface.blit(&life, 190 + i * 22, 14);
    }

    surface.blit(&sheet.get(SpriteId::GemSlot), 190, 36);
    if key_item {
        surface.blit(&sheet.get(SpriteId::PortalGem).frame(0, 0, 35, 35), 207, 36);
    }
}

fn draw_pause(surface: &mut dyn Surface, pause: &PauseScene, session: &Session, sheet: &SpriteSheet) {
    if pause.mode == PauseMode::Dead {
        surface.fill(screen(), Brush::Night);
        surface.blit(&sheet.get(SpriteId::GameOver), 0, 0);
        text_centered(surface, "Game Over", 180, TextStyle::Title);
        text_centered(surface, &format!("Final score {}", session.score), 220, TextStyle::Normal);
        text_centered(surface, "Press Enter", 400, TextStyle::Dim);
        return;
    }

    draw_play(surface, &pause.play, session, sheet);
    surface.fill(screen(), Brush::Shade);
    match pause.mode {
        PauseMode::Resume => {
            let lines = ["Paused".to_string(), "Esc to resume".to_string()];
            draw_message_box(surface, &lines, sheet);
        }
        PauseMode::Message => {
            draw_message_box(surface, &pause.lines, sheet);
            text_centered(surface, "Press Enter", MESSAGE_BOX.1 + 170, TextStyle::Dim);
        }
        PauseMode::Dying { .. } | PauseMode::Dead => draw_message_box(surface, &pause.lines, sheet),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::viewport::Viewport;
    use crate::sim::field::PlayField;
    use crate::sim::session::tests::session;
    use crate::sim::surface::tests::Recorder;

    fn play(s: &mut Session) -> PlayScene {
        let level = &s.levels[0];
        s.player.enter_level(level.player_x, level.player_y, level.height(), 20);
        let field = PlayField::setup(level, &s.player.view);
        PlayScene { level: 0, field }
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = format_message("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(format_message("   ", 10).is_empty());
        assert_eq!(format_message("supercalifragilistic ok", 5), vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn portal_only_shows_with_key_item() {
        let mut s = session();
        let mut scene = play(&mut s);
        assert_eq!(s.player.view, Viewport::new(0, -120));
        scene.field.exit = Rect::new(300, 350, PORTAL_WIDTH, PORTAL_HEIGHT);

        let mut r = Recorder::default();
        draw(&mut r, &Scene::Play(scene), &s, &SpriteSheet);
        assert_eq!(r.blitted(SpriteId::Portal), 0);
        assert_eq!(r.blitted(SpriteId::Brick), 16);
        assert_eq!(r.blitted(SpriteId::Player), 1);
        assert_eq!(r.blitted(SpriteId::LifeIcon), 4);

        let mut scene = play(&mut s);
        scene.field.key_item = true;
        let mut r = Recorder::default();
        draw(&mut r, &Scene::Play(scene), &s, &SpriteSheet);
        // Portal on screen plus the gem in the HUD slot.
        assert_eq!(r.blitted(SpriteId::PortalGem), 1);
    }

    #[test]
    fn game_over_screen_shows_score() {
        let mut s = session();
        s.score = 40;
        let pause = PauseScene::new(play(&mut s), PauseMode::Dead, "");
        let mut r = Recorder::default();
        draw(&mut r, &Scene::Pause(pause), &s, &SpriteSheet);
        assert_eq!(r.blitted(SpriteId::GameOver), 1);
        assert!(r.said("Final score 40"));
    }

    #[test]
    fn world_marks_completed_levels() {
        let mut s = session();
        s.levels[1].complete = true;
        s.notify("Game saved");
        let mut r = Recorder::default();
        draw(&mut r, &Scene::World(WorldScene::default()), &s, &SpriteSheet);
        assert_eq!(r.blitted(SpriteId::LevelIcon), 1);
        assert_eq!(r.blitted(SpriteId::LevelIconDone), 1);
        assert_eq!(r.blitted(SpriteId::Avatar), 1);
        assert!(r.said("Second"));
        assert!(r.said("Game saved"));
    }

    #[test]
    fn title_highlights_the_cursor() {
        let s = session();
        let mut title = TitleScene::main();
        title.menu.next();
        let mut r = Recorder::default();
        draw(&mut r, &Scene::Title(title), &s, &SpriteSheet);
        assert!(r
            .texts
            .iter()
            .any(|(t, style)| t.contains("Load Game") && *style == TextStyle::Highlight));
        assert!(r.said("New Game"));
    }
}
