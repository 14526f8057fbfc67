//! Tile: The immutable descriptor stored in every grid cell.
//!
//! A tile is a symbol, a foreground/background color pair and a small set
//! of property flags. Tiles are `Copy` and compared by value, so the
//! dispatcher can recognise the Trap or Portal simply by looking at what
//! occupies a coordinate.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Terminal default foreground.
    pub const DEFAULT_FG: Self = Self::from_u32(0xD0_D0_D0);
    /// Terminal default background.
    pub const DEFAULT_BG: Self = Self::from_u32(0x10_10_10);
    /// Dark grey, used for the player marker.
    pub const DARK_GREY: Self = Self::from_u32(0x60_60_60);
    /// Red, used for hostile tiles.
    pub const RED: Self = Self::from_u32(0xD0_30_30);
    /// Green, used for vegetation.
    pub const GREEN: Self = Self::from_u32(0x30_B0_40);
    /// Yellow, used for the guard.
    pub const YELLOW: Self = Self::from_u32(0xE0_C0_30);
    /// Cyan, used for the portal.
    pub const CYAN: Self = Self::from_u32(0x30_C0_D0);
    /// Wall foreground.
    pub const WALL_FG: Self = Self::from_u32(0x8A_8A_8A);
    /// Wall background.
    pub const WALL_BG: Self = Self::from_u32(0x3A_3A_3A);
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

bitflags! {
    /// Tile properties.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileFlags: u8 {
        /// Blocks passage.
        const TANGIBLE = 0b0000_0001;
        /// Blocks sight. Only walls carry it; kept from the map legend.
        const OPAQUE = 0b0000_0010;
    }
}

impl std::fmt::Debug for TileFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// A single grid cell descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Tile {
    symbol: char,
    fg: Rgb,
    bg: Rgb,
    flags: TileFlags,
}

impl Default for Tile {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Tile {
    /// Build a tile from its parts.
    #[inline]
    pub const fn new(symbol: char, fg: Rgb, bg: Rgb, flags: TileFlags) -> Self {
        Self { symbol, fg, bg, flags }
    }

    /// Solid, opaque wall.
    pub const WALL: Self = Self::new(
        '▤',
        Rgb::WALL_FG,
        Rgb::WALL_BG,
        TileFlags::TANGIBLE.union(TileFlags::OPAQUE),
    );
    /// Static enemy marker. Blocks passage.
    pub const ENEMY: Self = Self::new('☠', Rgb::RED, Rgb::DEFAULT_BG, TileFlags::TANGIBLE);
    /// Decorative vegetation. Walkable.
    pub const VEGETATION: Self =
        Self::new('♣', Rgb::GREEN, Rgb::DEFAULT_BG, TileFlags::empty());
    /// Empty floor.
    pub const EMPTY: Self = Self::new(' ', Rgb::DEFAULT_FG, Rgb::DEFAULT_BG, TileFlags::empty());
    /// The player marker.
    ///
    /// Never stored in the grid; it locates the start position while a map
    /// loads and is drawn over the player's coordinate.
    pub const PLAYER: Self =
        Self::new('☺', Rgb::DARK_GREY, Rgb::DEFAULT_BG, TileFlags::TANGIBLE);
    /// Patrolling guard.
    pub const GUARD: Self = Self::new('G', Rgb::YELLOW, Rgb::DEFAULT_BG, TileFlags::TANGIBLE);
    /// Timed portal. Walkable, teleports the player.
    pub const PORTAL: Self = Self::new('P', Rgb::CYAN, Rgb::DEFAULT_BG, TileFlags::empty());
    /// Reactive trap. Walkable, ends the game for the player.
    pub const TRAP: Self = Self::new('A', Rgb::RED, Rgb::DEFAULT_BG, TileFlags::empty());

    /// Display symbol.
    #[inline]
    pub const fn symbol(&self) -> char {
        self.symbol
    }

    /// Foreground color.
    #[inline]
    pub const fn fg(&self) -> Rgb {
        self.fg
    }

    /// Background color.
    #[inline]
    pub const fn bg(&self) -> Rgb {
        self.bg
    }

    /// Property flags.
    #[inline]
    pub const fn flags(&self) -> TileFlags {
        self.flags
    }

    /// Whether this tile blocks passage.
    #[inline]
    pub const fn is_tangible(&self) -> bool {
        self.flags.contains(TileFlags::TANGIBLE)
    }

    /// Map a map-file character to the tile it loads as.
    ///
    /// Unknown characters, and the player marker itself, load as empty floor.
    pub const fn from_map_char(c: char) -> Self {
        match c {
            '▤' => Self::WALL,
            '☠' => Self::ENEMY,
            '♣' => Self::VEGETATION,
            _ => Self::EMPTY,
        }
    }

    /// Display width of the symbol in terminal columns.
    pub fn display_width(&self) -> usize {
        unicode_width::UnicodeWidthChar::width(self.symbol).unwrap_or(1)
    }
}
