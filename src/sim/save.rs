/// Save and load game progress as JSON, one file per character.
///
/// ## What is saved
///   Character name, lives, score, tick count, completion per level name,
///   avatar position and the overworld camera offset. Saves are only taken
///   from the overworld, so there is never a level in progress to capture.
///
/// ## Files
///   `<saves_dir>/<name>.json`. Listing returns file names sorted, which is
///   what the Load Game menu shows.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::viewport::Viewport;
use crate::error::{GameError, GameResult};
use super::session::Session;

pub const SAVE_EXT: &str = "json";

// ══════════════════════════════════════════════════════════════
// Public types
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SaveData {
    pub name: String,
    pub lives: i32,
    pub score: u32,
    pub count: u64,
    pub complete: BTreeMap<String, bool>,
    pub world_char_x: i32,
    pub world_char_y: i32,
    pub world_view_x: i32,
    pub world_view_y: i32,
}

// ══════════════════════════════════════════════════════════════
// Capture / restore (Session ↔ SaveData)
// ══════════════════════════════════════════════════════════════

pub fn capture(session: &Session) -> SaveData {
    SaveData {
        name: session.player.name.clone(),
        lives: session.player.lives,
        score: session.score,
        count: session.count,
        complete: session
            .levels
            .iter()
            .map(|l| (l.name.clone(), l.complete))
            .collect(),
        world_char_x: session.avatar.x,
        world_char_y: session.avatar.y,
        world_view_x: session.avatar.view.x,
        world_view_y: session.avatar.view.y,
    }
}

/// Start a new game, then overlay the saved fields. Level names the save
/// doesn't mention stay incomplete; names the levels don't have are ignored.
pub fn restore(session: &mut Session, data: &SaveData) {
    session.new_game();
    session.player.name = data.name.clone();
    session.player.lives = data.lives;
    session.score = data.score;
    session.count = data.count;
    for level in &mut session.levels {
        level.complete = data.complete.get(&level.name).copied().unwrap_or(false);
    }
    session.avatar.x = data.world_char_x;
    session.avatar.y = data.world_char_y;
    session.avatar.view = Viewport::new(data.world_view_x, data.world_view_y);
    info!(name = %data.name, score = data.score, lives = data.lives, "save restored");
}

// ══════════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════════

pub fn file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{safe}.{SAVE_EXT}")
}

pub fn write(dir: &Path, data: &SaveData) -> GameResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| GameError::io(dir, e))?;
    let path = dir.join(file_name(&data.name));
    let text = serde_json::to_string_pretty(data).map_err(|source| GameError::SaveFormat {
        path: path.clone(),
        source,
    })?;
    std::fs::write(&path, text).map_err(|e| GameError::io(&path, e))?;
    info!(path = %path.display(), "game saved");
    Ok(path)
}

pub fn read(path: &Path) -> GameResult<SaveData> {
    let text = std::fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    let data = serde_json::from_str(&text).map_err(|source| GameError::SaveFormat {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "save decoded");
    Ok(data)
}

/// Save file names in `dir`, sorted. A missing directory has no saves.
pub fn list(dir: &Path) -> GameResult<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(GameError::io(dir, e)),
    };
    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().map_or(false, |x| x == SAVE_EXT))
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::tests::session;

    #[test]
    fn capture_restore_keeps_exact_fields() {
        let mut s = session();
        s.score = 130;
        s.count = 4242;
        s.player.lives = 2;
        s.levels[1].complete = true;
        s.avatar.x = 215;
        s.avatar.y = 260;
        s.avatar.view = Viewport::new(-35, -480);
        let data = capture(&s);

        let mut other = session();
        restore(&mut other, &data);
        assert_eq!(capture(&other), data);
        assert!(other.levels[1].complete);
        assert!(!other.levels[0].complete);
        assert_eq!(other.player.hp_current, other.player.hp_total);
    }

    #[test]
    fn write_then_read_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let data = capture(&session());
        let path = write(dir.path(), &data).unwrap();
        assert_eq!(path.file_name().unwrap(), "Mona.json");
        assert_eq!(read(&path).unwrap(), data);
        assert_eq!(list(dir.path()).unwrap(), vec!["Mona.json".to_string()]);
    }

    #[test]
    fn uses_pascal_case_keys() {
        let text = serde_json::to_string(&capture(&session())).unwrap();
        for key in ["\"Name\"", "\"Lives\"", "\"Complete\"", "\"WorldCharX\"", "\"WorldViewY\""] {
            assert!(text.contains(key), "missing {key}");
        }
    }

    #[test]
    fn missing_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn malformed_save_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(read(&path), Err(GameError::SaveFormat { .. })));
        assert!(matches!(read(&dir.path().join("gone.json")), Err(GameError::Io { .. })));
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(file_name("Mona"), "Mona.json");
        assert_eq!(file_name("../x y"), "___x_y.json");
    }
}
