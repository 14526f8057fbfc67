//! World module: The shared mutable game state.
//!
//! This module contains:
//! - [`Tile`]: Immutable cell descriptor (symbol, colors, flags)
//! - [`Grid`]: Row-major tile storage with ragged rows
//! - [`World`]: Grid + player position + displaced-tile register + entity slots
//! - [`SharedWorld`]: The lock every mover goes through
//! - [`StatusLine`]: Last user-facing message, outside the lock
//! - [`map`]: Map-file loading

mod entity;
mod grid;
mod lock;
mod movement;
mod tile;
pub mod map;
pub mod status;

pub use entity::EntityKind;
pub use grid::{Grid, Pos};
pub use lock::{SharedWorld, WorldGuard};
pub use status::StatusLine;
pub use tile::{Rgb, Tile, TileFlags};

/// The shared world aggregate.
///
/// Only ever touched through a [`WorldGuard`] once the game has started.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    player: Pos,
    /// The tile most recently pushed out of the way by any move.
    displaced: Tile,
    entities: [Option<Pos>; EntityKind::COUNT],
}

impl World {
    /// Create a world with the player at `player`.
    pub const fn new(grid: Grid, player: Pos) -> Self {
        Self {
            grid,
            player,
            displaced: Tile::EMPTY,
            entities: [None; EntityKind::COUNT],
        }
    }

    /// The tile grid.
    #[inline]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The player's coordinates.
    #[inline]
    pub const fn player(&self) -> Pos {
        self.player
    }

    /// Move the player marker without touching the grid.
    #[inline]
    pub const fn set_player(&mut self, pos: Pos) {
        self.player = pos;
    }

    /// Current content of the displaced-tile register.
    #[inline]
    pub const fn displaced(&self) -> Tile {
        self.displaced
    }

    /// Where `kind` currently stands, if it has been placed.
    #[inline]
    pub const fn entity_pos(&self, kind: EntityKind) -> Option<Pos> {
        self.entities[kind.index()]
    }

    /// Which entity stands at `pos`, if any.
    pub fn entity_at(&self, pos: Pos) -> Option<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| self.entity_pos(*kind) == Some(pos))
    }

    /// Write the entity's tile at `at` and record its position.
    ///
    /// Returns `false`, leaving the world untouched, if `at` is not in the grid.
    pub fn place_entity(&mut self, kind: EntityKind, at: Pos) -> bool {
        if !self.grid.set(at, kind.tile()) {
            return false;
        }
        self.entities[kind.index()] = Some(at);
        true
    }

    /// Copy out everything a renderer needs.
    pub fn snapshot(&self, status: String) -> Snapshot {
        Snapshot {
            rows: self.grid.rows().to_vec(),
            player: self.player,
            status,
        }
    }
}

/// A point-in-time copy of the world for drawing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Grid rows.
    pub rows: Vec<Vec<Tile>>,
    /// Player coordinates.
    pub player: Pos,
    /// Status message.
    pub status: String,
}
