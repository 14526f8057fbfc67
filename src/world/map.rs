//! Map loading.
//!
//! A map is plain text, one row per line and one character per column.
//!
//! | Char | Loads as                                   |
//! |------|--------------------------------------------|
//! | `▤`  | wall (tangible, opaque)                    |
//! | `☠`  | enemy marker (tangible)                    |
//! | `♣`  | vegetation (walkable)                      |
//! | `☺`  | empty floor; marks the player start        |
//! | else | empty floor                                |
//!
//! Rows keep their own lengths. A map without `☺` starts the player at (0, 0).

use super::{Grid, Pos, Tile, World};
use crate::error::{GameError, Result};
use std::path::Path;
use tracing::debug;

/// A parsed map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedMap {
    /// The tile grid.
    pub grid: Grid,
    /// Player start coordinates.
    pub start: Pos,
}

impl LoadedMap {
    /// Turn the map into a fresh world.
    pub fn into_world(self) -> World {
        World::new(self.grid, self.start)
    }
}

/// Parse map text.
pub fn parse_map(text: &str) -> LoadedMap {
    let mut start = Pos::default();
    let mut rows = Vec::new();

    for (y, line) in text.lines().enumerate() {
        let mut row = Vec::with_capacity(line.len());
        for (x, c) in line.chars().enumerate() {
            if c == Tile::PLAYER.symbol() {
                start = Pos::new(to_coord(x), to_coord(y));
            }
            row.push(Tile::from_map_char(c));
        }
        rows.push(row);
    }

    LoadedMap {
        grid: Grid::from_rows(rows),
        start,
    }
}

/// Read and parse a map file.
pub fn load_map(path: &Path) -> Result<LoadedMap> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::MapLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let map = parse_map(&text);
    debug!(
        path = %path.display(),
        rows = map.grid.height(),
        start_x = map.start.x,
        start_y = map.start.y,
        "map_loaded"
    );
    Ok(map)
}

fn to_coord(i: usize) -> i32 {
    i32::try_from(i).unwrap_or(i32::MAX)
}
