//! The three autonomous entity kinds.

use super::tile::Tile;

/// Tagged variant over the entities that live on the grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EntityKind {
    /// Patrols at random and chases the player on request.
    Guard,
    /// Teleports the player; vanishes from view after inactivity.
    Portal,
    /// Ends the game when the player steps on it.
    Trap,
}

impl EntityKind {
    /// Every kind, in slot order.
    pub const ALL: [Self; 3] = [Self::Guard, Self::Portal, Self::Trap];

    /// Number of entity slots in a world.
    pub const COUNT: usize = Self::ALL.len();

    /// Slot index of this kind.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Guard => 0,
            Self::Portal => 1,
            Self::Trap => 2,
        }
    }

    /// The tile this entity is drawn with.
    #[inline]
    pub const fn tile(self) -> Tile {
        match self {
            Self::Guard => Tile::GUARD,
            Self::Portal => Tile::PORTAL,
            Self::Trap => Tile::TRAP,
        }
    }

    /// Short name, used for thread names and logs.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Guard => "guard",
            Self::Portal => "portal",
            Self::Trap => "trap",
        }
    }

    /// The entity whose tile is `tile`, if any.
    pub fn from_tile(tile: Tile) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tile() == tile)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
