//! Pieces tests - rotation tables and derived piece geometry

use replay_tetris::core::pieces::{get_shape, rotation_count, rotation_states};
use replay_tetris::core::Piece;
use replay_tetris::types::TileType;

// ============== Shape Tests ==============

#[test]
fn test_rotation_state_counts() {
    assert_eq!(rotation_count(TileType::I), 2);
    assert_eq!(rotation_count(TileType::O), 1);
    assert_eq!(rotation_count(TileType::T), 4);
    assert_eq!(rotation_count(TileType::S), 2);
    assert_eq!(rotation_count(TileType::Z), 2);
    assert_eq!(rotation_count(TileType::J), 4);
    assert_eq!(rotation_count(TileType::L), 4);
    assert_eq!(rotation_count(TileType::Empty), 0);
    assert_eq!(rotation_count(TileType::Wall), 0);
}

#[test]
fn test_i_piece_shapes() {
    assert_eq!(
        get_shape(TileType::I, 0),
        Some([(0, 2), (0, 1), (0, 0), (0, -1)])
    );
    assert_eq!(
        get_shape(TileType::I, 1),
        Some([(-2, 0), (-1, 0), (0, 0), (1, 0)])
    );
    // Rotation index wraps
    assert_eq!(get_shape(TileType::I, 2), get_shape(TileType::I, 0));
}

#[test]
fn test_every_state_has_four_distinct_cells_around_pivot() {
    for kind in TileType::PLACEABLE {
        for shape in rotation_states(kind) {
            let mut cells = shape.to_vec();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), 4, "{kind:?} {shape:?}");
            assert!(shape.contains(&(0, 0)), "{kind:?} pivot missing");
        }
    }
}

#[test]
fn test_non_placeable_have_no_shape() {
    assert!(get_shape(TileType::Empty, 0).is_none());
    assert!(get_shape(TileType::Wall, 3).is_none());
}

// ============== Piece Tests ==============

#[test]
fn test_rotation_is_cyclic() {
    for kind in TileType::PLACEABLE {
        let mut piece = Piece::new(10, 10, kind).unwrap();
        let original = piece;
        for _ in 0..piece.rotation_count() {
            piece.rotate_cw();
        }
        assert_eq!(piece, original);
        assert_eq!(piece.cells(), original.cells());
    }
}

#[test]
fn test_ccw_from_zero_wraps_to_last_state() {
    let mut piece = Piece::new(5, 5, TileType::L).unwrap();
    piece.rotate_ccw();
    assert_eq!(piece.rotation(), 3);
}

#[test]
fn test_cells_follow_translation() {
    let mut piece = Piece::new(5, 5, TileType::S).unwrap();
    let before = piece.cells();
    piece.translate(2, 3);
    for (a, b) in before.iter().zip(piece.cells().iter()) {
        assert_eq!((a.0 + 2, a.1 + 3), *b);
    }
}

#[test]
fn test_with_rotation_wraps_large_index() {
    let piece = Piece::with_rotation(0, 0, TileType::J, 9).unwrap();
    assert_eq!(piece.rotation(), 1);
    let piece = Piece::with_rotation(0, 0, TileType::O, -5).unwrap();
    assert_eq!(piece.rotation(), 0);
}
