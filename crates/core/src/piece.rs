//! Piece module - a falling or queued tetromino instance
//!
//! A piece stores only its pivot, kind and rotation index; its cells are
//! derived from the rotation tables in [`crate::pieces`]. Shape space has y
//! pointing up while the grid has y pointing down, so a shape offset
//! `(dx, dy)` lands on grid cell `(x + dx, y - dy)`.

use crate::pieces::{get_shape, rotation_count, PieceShape};
use crate::types::TileType;

/// Grid cells covered by a piece
pub type PieceCells = [(i32, i32); 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub x: i32,
    pub y: i32,
    kind: TileType,
    rotation: usize,
}

impl Piece {
    /// Create a piece in its first rotation state.
    ///
    /// Returns `None` for `Empty` and `Wall`.
    pub fn new(x: i32, y: i32, kind: TileType) -> Option<Self> {
        Self::with_rotation(x, y, kind, 0)
    }

    /// Create a piece with an explicit rotation index (any integer, wrapped
    /// into the kind's state count with a non-negative modulo).
    pub fn with_rotation(x: i32, y: i32, kind: TileType, rotation: i64) -> Option<Self> {
        let count = rotation_count(kind);
        if count == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            kind,
            rotation: rotation.rem_euclid(count as i64) as usize,
        })
    }

    /// Caller guarantees `kind` is placeable (e.g. a weighted draw)
    pub(crate) fn spawn(x: i32, y: i32, kind: TileType) -> Self {
        Self {
            x,
            y,
            kind,
            rotation: 0,
        }
    }

    pub fn kind(&self) -> TileType {
        self.kind
    }

    pub fn rotation(&self) -> usize {
        self.rotation
    }

    pub fn rotation_count(&self) -> usize {
        rotation_count(self.kind)
    }

    /// Offsets for the current rotation state
    pub fn shape(&self) -> PieceShape {
        // Construction guarantees a placeable kind.
        get_shape(self.kind, self.rotation).unwrap_or([(0, 0); 4])
    }

    /// Grid cells covered at the current position and rotation
    pub fn cells(&self) -> PieceCells {
        let shape = self.shape();
        let mut out = [(0, 0); 4];
        for (slot, &(dx, dy)) in out.iter_mut().zip(shape.iter()) {
            *slot = (
                self.x.saturating_add(i32::from(dx)),
                self.y.saturating_sub(i32::from(dy)),
            );
        }
        out
    }

    /// Shift the pivot, clamping at the `i32` range
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }

    /// The piece shifted by `(dx, dy)`, or `None` if the pivot would overflow
    pub fn translated(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            ..*self
        })
    }

    pub fn rotate_cw(&mut self) {
        self.rotation = (self.rotation + 1) % self.rotation_count();
    }

    pub fn rotate_ccw(&mut self) {
        let count = self.rotation_count();
        self.rotation = (self.rotation + count - 1) % count;
    }
}
