/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels_file` from config, if it exists on disk
///   2. Built-in levels embedded from `assets/levels.json`
///
/// ## Format
///   A JSON array of level records with PascalCase keys:
///   ```json
///   [{ "Name": "Goo Alley", "Complete": false,
///      "WorldX": 250, "WorldY": 350, "PlayerX": 20, "PlayerY": 380,
///      "ExitX": 650, "ExitY": 350,
///      "Message": ["on entry", "on death", "on completion"],
///      "Layout": [[...192 terrain codes...], [...192 spawn codes...]] }]
///   ```
///
/// Every record is validated before play; one bad level fails the load.

use std::path::Path;

use tracing::info;

use crate::domain::level::LevelLayout;
use crate::error::{GameError, GameResult};

const EMBEDDED_LEVELS: &str = include_str!("../../assets/levels.json");

/// Load levels from `levels_file` if present, else the embedded set.
pub fn load_levels(levels_file: &Path) -> GameResult<Vec<LevelLayout>> {
    if levels_file.is_file() {
        let text = std::fs::read_to_string(levels_file).map_err(|e| GameError::io(levels_file, e))?;
        let levels = parse_levels(&text, &levels_file.display().to_string())?;
        info!(path = %levels_file.display(), count = levels.len(), "levels loaded");
        Ok(levels)
    } else {
        let levels = parse_levels(EMBEDDED_LEVELS, "built-in levels")?;
        info!(count = levels.len(), "built-in levels loaded");
        Ok(levels)
    }
}

pub fn parse_levels(text: &str, origin: &str) -> GameResult<Vec<LevelLayout>> {
    let levels: Vec<LevelLayout> = serde_json::from_str(text).map_err(|source| GameError::LevelFormat {
        origin: origin.to_string(),
        source,
    })?;
    if levels.is_empty() {
        return Err(GameError::NoLevels { origin: origin.to_string() });
    }
    for level in &levels {
        level.validate()?;
    }
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tile::{Tile, COLUMNS};

    #[test]
    fn embedded_levels_are_valid() {
        let levels = parse_levels(EMBEDDED_LEVELS, "embedded").unwrap();
        assert!(levels.len() >= 2);
        for level in &levels {
            assert_eq!(level.layout[0].len() % COLUMNS, 0);
            assert_eq!(level.layout.len(), 2);
            assert!(!level.complete);
            assert_eq!(level.message.len(), 3);
            let gems = level.layout[1].iter().filter(|&&c| Tile::from_code(c) == Tile::PortalGem).count();
            assert_eq!(gems, 1, "{} needs exactly one portal gem", level.name);
        }
    }

    #[test]
    fn missing_file_falls_back_to_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let levels = load_levels(&dir.path().join("levels.json")).unwrap();
        assert_eq!(levels[0].name, "Goo Alley");
    }

    #[test]
    fn file_on_disk_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        let one_row = format!(
            r#"[{{"Name":"Tiny","WorldX":0,"WorldY":0,"PlayerX":20,"PlayerY":380,"ExitX":0,"ExitY":0,"Layout":[{:?}]}}]"#,
            vec![1; COLUMNS]
        );
        std::fs::write(&path, one_row).unwrap();
        let levels = load_levels(&path).unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].name, "Tiny");
    }

    #[test]
    fn bad_data_is_fatal() {
        assert!(matches!(parse_levels("nope", "t"), Err(GameError::LevelFormat { .. })));
        assert!(matches!(parse_levels("[]", "t"), Err(GameError::NoLevels { .. })));
        let ragged = r#"[{"Name":"R","WorldX":0,"WorldY":0,"PlayerX":0,"PlayerY":0,"ExitX":0,"ExitY":0,"Layout":[[0,0,0]]}]"#;
        assert!(matches!(parse_levels(ragged, "t"), Err(GameError::InvalidLevel { .. })));
    }
}
