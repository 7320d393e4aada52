/// Level templates as decoded from level data.
///
/// A `LevelLayout` is never mutated during play; the play field copies its
/// layers. Only `complete` changes, on the session's own copy.

use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::tile::{COLUMNS, TILE_SIZE};
use super::viewport::Viewport;
use crate::error::GameError;

/// Side of the square world-map hot-zone that enters a level.
pub const HOT_ZONE_SIZE: i32 = 150;
pub const PORTAL_WIDTH: i32 = 100;
pub const PORTAL_HEIGHT: i32 = 150;

/// Which narrative line to show.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Narrative {
    Enter = 0,
    Die = 1,
    Complete = 2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LevelLayout {
    pub name: String,
    #[serde(default)]
    pub complete: bool,
    pub world_x: i32,
    pub world_y: i32,
    /// Player spawn, screen units after the camera reset.
    pub player_x: i32,
    pub player_y: i32,
    /// Exit portal, world units.
    pub exit_x: i32,
    pub exit_y: i32,
    #[serde(default)]
    pub message: Vec<String>,
    pub layout: Vec<Vec<i32>>,
}

impl LevelLayout {
    /// Structural checks: at least one layer, equal lengths, whole rows.
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |reason: String| GameError::InvalidLevel { name: self.name.clone(), reason };

        let first = self
            .layout
            .first()
            .ok_or_else(|| invalid("no layers".to_string()))?;
        if first.is_empty() {
            return Err(invalid("empty terrain layer".to_string()));
        }
        if first.len() % COLUMNS != 0 {
            return Err(invalid(format!(
                "layer length {} is not a multiple of {COLUMNS} columns",
                first.len()
            )));
        }
        if let Some((i, layer)) = self
            .layout
            .iter()
            .enumerate()
            .find(|(_, layer)| layer.len() != first.len())
        {
            return Err(invalid(format!(
                "layer {i} has {} cells, expected {}",
                layer.len(),
                first.len()
            )));
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.layout.first().map_or(0, |layer| layer.len() / COLUMNS)
    }

    pub fn height(&self) -> i32 {
        self.rows() as i32 * TILE_SIZE
    }

    /// Narrative line, or "" when the level doesn't define it.
    pub fn message(&self, which: Narrative) -> &str {
        self.message.get(which as usize).map_or("", String::as_str)
    }

    /// World-map entry zone as seen through `view`.
    pub fn hot_zone(&self, view: &Viewport) -> Rect {
        let (x, y) = view.to_screen(self.world_x, self.world_y);
        Rect::new(x, y, HOT_ZONE_SIZE, HOT_ZONE_SIZE)
    }

    /// Exit portal in world units.
    pub fn exit_rect(&self) -> Rect {
        Rect::new(self.exit_x, self.exit_y, PORTAL_WIDTH, PORTAL_HEIGHT)
    }
}
