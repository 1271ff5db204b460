//! Pieces module - static rotation-state geometry for each piece kind
//!
//! Each placeable kind has a fixed, cyclic list of rotation states. A state is
//! four `(dx, dy)` offsets from the piece pivot in shape space, where `dy`
//! grows upward. Rotation is accept/reject only: there are no wall kicks.

use crate::types::TileType;

/// Offset of a single cell relative to the pivot (shape space, y up)
pub type CellOffset = (i8, i8);

/// Shape of a piece - four cell offsets from the pivot
pub type PieceShape = [CellOffset; 4];

const I_STATES: [PieceShape; 2] = [
    [(0, 2), (0, 1), (0, 0), (0, -1)],
    [(-2, 0), (-1, 0), (0, 0), (1, 0)],
];

const O_STATES: [PieceShape; 1] = [[(0, 0), (-1, 0), (0, 1), (-1, 1)]];

const T_STATES: [PieceShape; 4] = [
    [(-1, 0), (0, 0), (1, 0), (0, 1)],
    [(0, 1), (0, 0), (0, -1), (1, 0)],
    [(-1, 0), (0, 0), (1, 0), (0, -1)],
    [(0, 1), (0, 0), (0, -1), (-1, 0)],
];

const S_STATES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (1, -1), (0, 1)],
    [(0, 0), (0, -1), (-1, -1), (1, 0)],
];

const Z_STATES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (1, 1), (0, -1)],
    [(0, 0), (-1, 0), (0, -1), (1, -1)],
];

const J_STATES: [PieceShape; 4] = [
    [(-1, -1), (0, 0), (0, 1), (0, -1)],
    [(-1, 1), (0, 0), (-1, 0), (1, 0)],
    [(1, 1), (0, 0), (0, 1), (0, -1)],
    [(1, -1), (0, 0), (-1, 0), (1, 0)],
];

const L_STATES: [PieceShape; 4] = [
    [(1, -1), (0, 0), (0, 1), (0, -1)],
    [(-1, -1), (0, 0), (-1, 0), (1, 0)],
    [(-1, 1), (0, 0), (0, 1), (0, -1)],
    [(1, 1), (0, 0), (-1, 0), (1, 0)],
];

/// All rotation states for a tile type.
///
/// Empty for `Empty` and `Wall`, which are never placed as pieces.
pub fn rotation_states(kind: TileType) -> &'static [PieceShape] {
    match kind {
        TileType::I => &I_STATES,
        TileType::O => &O_STATES,
        TileType::T => &T_STATES,
        TileType::S => &S_STATES,
        TileType::Z => &Z_STATES,
        TileType::J => &J_STATES,
        TileType::L => &L_STATES,
        TileType::Empty | TileType::Wall => &[],
    }
}

/// Number of rotation states for a tile type (0 for non-placeable types)
pub fn rotation_count(kind: TileType) -> usize {
    rotation_states(kind).len()
}

/// Shape for a kind at a rotation index taken modulo the state count
pub fn get_shape(kind: TileType, rotation: usize) -> Option<PieceShape> {
    let states = rotation_states(kind);
    if states.is_empty() {
        return None;
    }
    Some(states[rotation % states.len()])
}
