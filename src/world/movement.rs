//! Movement primitive shared by the player and every entity.
//!
//! All functions here assume the caller holds the world lock.
//!
//! # The displaced register
//!
//! A move works like a one-slot conveyor:
//!
//! ```text
//!   origin      <- displaced
//!   displaced   <- destination
//!   destination <- origin (the mover)
//! ```
//!
//! Moving back along the inverse delta restores both cells and the
//! register, as long as no other mover ran in between.

use super::{EntityKind, Pos, World};

impl World {
    /// Whether a mover may step onto `pos`: inside its row and not tangible.
    pub fn can_enter(&self, pos: Pos) -> bool {
        self.grid.get(pos).is_some_and(|tile| !tile.is_tangible())
    }

    /// Move the occupant of `from` by `(dx, dy)`.
    ///
    /// No passability check is made; see [`World::transfer`].
    #[inline]
    pub fn move_tile(&mut self, from: Pos, dx: i32, dy: i32) -> bool {
        self.transfer(from, from.offset(dx, dy))
    }

    /// Move the occupant of `from` to `to` through the displaced register.
    ///
    /// Returns `false` without touching anything if either coordinate is
    /// outside the grid.
    pub fn transfer(&mut self, from: Pos, to: Pos) -> bool {
        let (Some(leaving), Some(_)) = (self.grid.get(from), self.grid.get(to)) else {
            return false;
        };
        if from == to {
            return true;
        }

        self.grid.set(from, self.displaced);
        if let Some(arriving) = self.grid.get(to) {
            self.displaced = arriving;
        }
        self.grid.set(to, leaving);
        true
    }

    /// Step an entity by `(dx, dy)` if the destination is free.
    ///
    /// The destination must pass [`World::can_enter`], must not be the
    /// player's coordinate and must not hold another entity. Returns the new
    /// position, or `None` if the entity stayed put.
    pub fn step_entity(&mut self, kind: EntityKind, dx: i32, dy: i32) -> Option<Pos> {
        let from = self.entity_pos(kind)?;
        if (dx, dy) == (0, 0) {
            return None;
        }

        let to = from.offset(dx, dy);
        if to == self.player || self.entity_at(to).is_some() || !self.can_enter(to) {
            return None;
        }

        self.transfer(from, to);
        self.entities[kind.index()] = Some(to);
        Some(to)
    }
}
