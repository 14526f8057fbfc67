//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::world::{Pos, Rgb, Snapshot, Tile};
use std::io::Write;

/// Help text shown under the status line.
pub const HELP: &str = "w/a/s/d or arrows: move   e: interact   Esc: quit";

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A whole frame is accumulated here, then flushed in a single `write()`
/// to prevent terminal flickering.
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical map (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Write a single character.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move cursor to (x, y) position (1-indexed for ANSI).
    #[inline]
    pub fn cursor_move(&mut self, x: u16, y: u16) {
        // CSI row ; col H
        let _ = write!(self.data, "\x1b[{};{}H", y + 1, x + 1);
    }

    /// Hide cursor.
    #[inline]
    pub fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Set foreground color (true color).
    #[inline]
    pub fn set_fg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Set background color (true color).
    #[inline]
    pub fn set_bg(&mut self, color: Rgb) {
        let _ = write!(self.data, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
    }

    /// Reset all attributes.
    #[inline]
    pub fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear from the cursor to the end of the line.
    #[inline]
    pub fn clear_line(&mut self) {
        self.data.extend_from_slice(b"\x1b[K");
    }

    /// Draw one tile with its colors.
    pub fn draw_tile(&mut self, tile: &Tile) {
        self.set_fg(tile.fg());
        self.set_bg(tile.bg());
        self.write_char(tile.symbol());
        // Keep columns aligned for zero-width symbols.
        if tile.display_width() == 0 {
            self.data.push(b' ');
        }
    }

    /// Draw a whole frame: grid rows with the player overlaid, then the
    /// status line and the key help.
    pub fn draw_snapshot(&mut self, snapshot: &Snapshot) {
        self.cursor_hide();

        let mut y: u16 = 0;
        for (row_idx, row) in snapshot.rows.iter().enumerate() {
            self.cursor_move(0, y);
            for (col_idx, tile) in row.iter().enumerate() {
                let here = Pos::new(
                    i32::try_from(col_idx).unwrap_or(i32::MAX),
                    i32::try_from(row_idx).unwrap_or(i32::MAX),
                );
                if here == snapshot.player {
                    // The player takes the floor's background.
                    self.draw_tile(&Tile::new(
                        Tile::PLAYER.symbol(),
                        Tile::PLAYER.fg(),
                        tile.bg(),
                        Tile::PLAYER.flags(),
                    ));
                } else {
                    self.draw_tile(tile);
                }
            }
            self.reset_attrs();
            self.clear_line();
            y = y.saturating_add(1);
        }

        self.cursor_move(0, y.saturating_add(1));
        self.write_str(&snapshot.status);
        self.clear_line();
        self.cursor_move(0, y.saturating_add(2));
        self.write_str(HELP);
        self.clear_line();
    }

    /// Flush to a writer in a single syscall.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
