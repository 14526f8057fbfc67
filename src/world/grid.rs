//! Grid: Row-major tile storage with per-row widths.
//!
//! Rows are independent `Vec`s, so a map with ragged lines keeps its shape
//! and every bounds check is made against the width of the row in question.

use super::tile::Tile;

/// A grid coordinate. Signed so that candidate moves off the left or top
/// edge are representable and can be rejected by bounds checks.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Pos {
    /// Create a new position.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This position shifted by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Unit step (sign of each axis) from `self` toward `target`.
    #[inline]
    pub const fn step_toward(self, target: Self) -> (i32, i32) {
        ((target.x - self.x).signum(), (target.y - self.y).signum())
    }

    /// Chebyshev (king-move) distance.
    #[inline]
    pub fn chebyshev(self, other: Self) -> u32 {
        (self.x - other.x)
            .unsigned_abs()
            .max((self.y - other.y).unsigned_abs())
    }
}

impl From<(i32, i32)> for Pos {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// The tile grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    /// Create a grid from rows of tiles.
    pub const fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        Self { rows }
    }

    /// Create a rectangular grid filled with `tile`.
    pub fn filled(width: usize, height: usize, tile: Tile) -> Self {
        Self {
            rows: vec![vec![tile; width]; height],
        }
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Width of row `y`, or 0 if the row does not exist.
    #[inline]
    pub fn row_width(&self, y: i32) -> usize {
        usize::try_from(y)
            .ok()
            .and_then(|y| self.rows.get(y))
            .map_or(0, Vec::len)
    }

    /// Rows in order.
    #[inline]
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Convert a position to `(column, row)` indices if it lies in the grid.
    #[inline]
    fn index_of(&self, pos: Pos) -> Option<(usize, usize)> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        let row = self.rows.get(y)?;
        (x < row.len()).then_some((x, y))
    }

    /// Whether `pos` lies inside its row.
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.index_of(pos).is_some()
    }

    /// Get the tile at `pos`.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.index_of(pos).map(|(x, y)| self.rows[y][x])
    }

    /// Set the tile at `pos`.
    ///
    /// Returns `false` if the coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, pos: Pos, tile: Tile) -> bool {
        if let Some((x, y)) = self.index_of(pos) {
            self.rows[y][x] = tile;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ragged() -> Grid {
        Grid::from_rows(vec![
            vec![Tile::EMPTY; 3],
            vec![Tile::WALL],
            vec![Tile::EMPTY; 5],
        ])
    }

    #[test]
    fn test_grid_ragged_bounds() {
        let grid = ragged();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.row_width(0), 3);
        assert_eq!(grid.row_width(1), 1);
        assert_eq!(grid.row_width(3), 0);
        assert_eq!(grid.row_width(-1), 0);

        assert!(grid.contains(Pos::new(2, 0)));
        assert!(!grid.contains(Pos::new(2, 1)));
        assert!(grid.contains(Pos::new(4, 2)));
        assert!(!grid.contains(Pos::new(-1, 0)));
        assert!(!grid.contains(Pos::new(0, -1)));
    }

    #[test]
    fn test_grid_get_set() {
        let mut grid = ragged();
        assert_eq!(grid.get(Pos::new(0, 1)), Some(Tile::WALL));
        assert!(grid.set(Pos::new(4, 2), Tile::VEGETATION));
        assert_eq!(grid.get(Pos::new(4, 2)), Some(Tile::VEGETATION));
        assert!(!grid.set(Pos::new(1, 1), Tile::VEGETATION));
        assert_eq!(grid.get(Pos::new(1, 1)), None);
    }

    #[test]
    fn test_pos_helpers() {
        let a = Pos::new(2, 2);
        assert_eq!(a.offset(1, -1), Pos::new(3, 1));
        assert_eq!(a.step_toward(Pos::new(7, 2)), (1, 0));
        assert_eq!(a.step_toward(Pos::new(0, 0)), (-1, -1));
        assert_eq!(a.step_toward(a), (0, 0));
        assert_eq!(a.chebyshev(Pos::new(5, 3)), 3);
    }
}
