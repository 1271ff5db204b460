//! Board module - manages the game grid
//!
//! The board is a `width x height` grid of tiles surrounded on three sides by
//! permanent walls (bottom row, left column, right column). The top is open:
//! pieces spawn at row 0 with cells that may hang above the board.
//! Uses flat row-major storage for tiles and for the parallel dirty-flag grid.
//! Coordinates: (x, y) where x grows to the right and y grows downward.

use crate::types::TileType;

/// A single board cell
///
/// Emptiness, wall-ness and block-ness are derived from the tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Tile {
    tile_type: TileType,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self { tile_type }
    }

    pub fn tile_type(&self) -> TileType {
        self.tile_type
    }

    pub fn is_empty(&self) -> bool {
        self.tile_type == TileType::Empty
    }

    pub fn is_wall(&self) -> bool {
        self.tile_type == TileType::Wall
    }

    /// A locked piece cell (neither empty nor wall)
    pub fn is_block(&self) -> bool {
        !self.is_empty() && !self.is_wall()
    }
}

/// The game board with wall ring and dirty tracking
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Row-major tiles (y * width + x)
    tiles: Vec<Tile>,
    /// Row-major redraw flags, set whenever a tile's type changes
    dirty: Vec<bool>,
}

impl Board {
    /// Create a board with walls in place.
    ///
    /// Dimensions are clamped to at least 3x2 so the wall ring always has an
    /// interior column and a row above the floor.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(3);
        let height = height.max(2);
        let size = width as usize * height as usize;
        let mut board = Self {
            width,
            height,
            tiles: vec![Tile::default(); size],
            dirty: vec![true; size],
        };
        board.initialize();
        board
    }

    /// Build a board from persisted rows of tile types.
    ///
    /// Rows or cells beyond the board size are ignored; missing ones keep their
    /// initialised value.
    pub fn from_tile_rows(width: u16, height: u16, rows: &[Vec<TileType>]) -> Self {
        let mut board = Self::new(width, height);
        for (y, row) in rows.iter().enumerate().take(board.height as usize) {
            for (x, &tile_type) in row.iter().enumerate().take(board.width as usize) {
                board.set_tile(x as i32, y as i32, tile_type);
            }
        }
        board
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.is_valid_position(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Reset to the initial layout: wall ring on bottom/left/right, empty elsewhere.
    ///
    /// Idempotent; used at construction and on restart.
    pub fn initialize(&mut self) {
        let w = self.width as i32;
        let h = self.height as i32;
        for y in 0..h {
            for x in 0..w {
                let wall = y == h - 1 || x == 0 || x == w - 1;
                let tile_type = if wall { TileType::Wall } else { TileType::Empty };
                self.set_tile(x, y, tile_type);
            }
        }
    }

    /// Tile at (x, y), or `None` when out of range
    pub fn get_tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Set the tile type at (x, y).
    ///
    /// Returns true only when the type actually changed (the cell is then marked
    /// dirty). Out-of-range coordinates are a no-op returning false.
    pub fn set_tile(&mut self, x: i32, y: i32, tile_type: TileType) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if self.tiles[idx].tile_type == tile_type {
            return false;
        }
        self.tiles[idx] = Tile::new(tile_type);
        self.dirty[idx] = true;
        true
    }

    /// Check if (x, y) lies on the board
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Check if (x, y) lies strictly inside the wall ring
    pub fn is_interior_position(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.width as i32 - 1 && y > 0 && y < self.height as i32 - 1
    }

    /// A cell a piece may not occupy: on the board and not empty.
    ///
    /// Cells off the board (including above the open top) never collide.
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.get_tile(x, y).is_some_and(|tile| !tile.is_empty())
    }

    /// Check if a row has no empty cell (walls count as filled)
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        let start = y * self.width as usize;
        let end = start + self.width as usize;
        self.tiles[start..end].iter().all(|tile| !tile.is_empty())
    }

    /// Clear every full row above the floor and compact the rest downward.
    ///
    /// Scans from the row above the bottom wall up to the top. Full rows are
    /// dropped; every non-full row moves down by the number of full rows found
    /// below it. The rows vacated at the top get an empty interior. Wall columns
    /// are never written. Returns the number of rows cleared.
    pub fn clear_full_lines(&mut self) -> usize {
        let w = self.width as i32;
        let floor = self.height as i32 - 1;
        let mut cleared = 0i32;

        for y in (0..floor).rev() {
            if self.is_row_full(y as usize) {
                cleared += 1;
                continue;
            }
            if cleared > 0 {
                for x in 1..w - 1 {
                    let tile_type = self.tiles[self.flat(x, y)].tile_type;
                    self.set_tile(x, y + cleared, tile_type);
                }
            }
        }

        for y in 0..cleared.min(floor) {
            for x in 1..w - 1 {
                self.set_tile(x, y, TileType::Empty);
            }
        }

        cleared as usize
    }

    #[inline(always)]
    fn flat(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Check whether (x, y) changed since the last [`Board::clear_dirty`]
    pub fn is_dirty(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.dirty[idx])
    }

    /// Number of cells awaiting redraw
    pub fn dirty_count(&self) -> usize {
        self.dirty.iter().filter(|d| **d).count()
    }

    /// Mark every cell as drawn
    pub fn clear_dirty(&mut self) {
        self.dirty.iter_mut().for_each(|d| *d = false);
    }

    /// Count locked piece cells
    pub fn block_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_block()).count()
    }

    /// Tile types row by row, top to bottom
    pub fn rows(&self) -> Vec<Vec<TileType>> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(Tile::tile_type).collect())
            .collect()
    }

    /// Compare grids only, ignoring redraw state
    pub fn same_tiles(&self, other: &Board) -> bool {
        self.width == other.width && self.height == other.height && self.tiles == other.tiles
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_BOARD_WIDTH, crate::types::DEFAULT_BOARD_HEIGHT)
    }
}
