//! Board tests - wall ring, change detection and line clearing

use replay_tetris::core::Board;
use replay_tetris::types::{TileType, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};

fn tile(board: &Board, x: i32, y: i32) -> TileType {
    board.get_tile(x, y).map(|t| t.tile_type()).unwrap()
}

fn fill_row(board: &mut Board, y: i32, kind: TileType) {
    for x in 1..i32::from(board.width()) - 1 {
        board.set_tile(x, y, kind);
    }
}

#[test]
fn test_board_default_size_and_walls() {
    let board = Board::default();
    assert_eq!(board.width(), DEFAULT_BOARD_WIDTH);
    assert_eq!(board.height(), DEFAULT_BOARD_HEIGHT);

    let (w, h) = (i32::from(board.width()), i32::from(board.height()));
    for y in 0..h {
        for x in 0..w {
            let expected = if y == h - 1 || x == 0 || x == w - 1 {
                TileType::Wall
            } else {
                TileType::Empty
            };
            assert_eq!(tile(&board, x, y), expected, "cell ({x}, {y})");
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new(10, 8);
    assert!(board.get_tile(-1, 0).is_none());
    assert!(board.get_tile(0, -1).is_none());
    assert!(board.get_tile(10, 0).is_none());
    assert!(board.get_tile(0, 8).is_none());
}

#[test]
fn test_board_set_out_of_bounds_is_noop() {
    let mut board = Board::new(10, 8);
    let before = board.clone();
    assert!(!board.set_tile(-1, 0, TileType::T));
    assert!(!board.set_tile(0, 8, TileType::T));
    assert!(board.same_tiles(&before));
}

#[test]
fn test_set_tile_change_detection() {
    let mut board = Board::new(10, 8);
    board.clear_dirty();

    assert!(board.set_tile(4, 4, TileType::S));
    assert!(board.is_dirty(4, 4));
    assert_eq!(board.dirty_count(), 1);

    board.clear_dirty();
    assert!(!board.set_tile(4, 4, TileType::S));
    assert!(!board.is_dirty(4, 4));
    assert_eq!(board.dirty_count(), 0);
}

#[test]
fn test_position_predicates() {
    let board = Board::new(10, 8);
    assert!(board.is_valid_position(0, 0));
    assert!(board.is_valid_position(9, 7));
    assert!(!board.is_valid_position(10, 7));

    assert!(board.is_interior_position(1, 1));
    assert!(!board.is_interior_position(1, 0));
    assert!(board.is_interior_position(8, 6));
    assert!(!board.is_interior_position(0, 3));
    assert!(!board.is_interior_position(9, 3));
    assert!(!board.is_interior_position(4, 7));
}

#[test]
fn test_blocked_ignores_cells_above_board() {
    let board = Board::new(10, 8);
    assert!(!board.is_blocked(4, -1));
    assert!(!board.is_blocked(4, 3));
    assert!(board.is_blocked(0, 3));
    assert!(board.is_blocked(4, 7));
}

#[test]
fn test_clear_on_empty_board_mutates_nothing() {
    let mut board = Board::default();
    board.clear_dirty();
    let before = board.clone();

    assert_eq!(board.clear_full_lines(), 0);
    assert!(board.same_tiles(&before));
    assert_eq!(board.dirty_count(), 0);
}

#[test]
fn test_clear_single_full_row() {
    let mut board = Board::default();
    let y = 10;
    fill_row(&mut board, y, TileType::I);
    assert!(board.is_row_full(y as usize));

    assert_eq!(board.clear_full_lines(), 1);

    let w = i32::from(board.width());
    for x in 1..w - 1 {
        assert_eq!(tile(&board, x, y), TileType::Empty);
    }
    assert_eq!(tile(&board, 0, y), TileType::Wall);
    assert_eq!(tile(&board, w - 1, y), TileType::Wall);
    assert_eq!(board.block_count(), 0);
}

#[test]
fn test_clear_compacts_rows_above() {
    let mut board = Board::new(6, 8);
    // Row 6 full, row 5 has one block, row 4 full, row 3 has one block.
    fill_row(&mut board, 6, TileType::O);
    board.set_tile(2, 5, TileType::T);
    fill_row(&mut board, 4, TileType::O);
    board.set_tile(3, 3, TileType::L);

    assert_eq!(board.clear_full_lines(), 2);

    assert_eq!(tile(&board, 2, 6), TileType::T);
    assert_eq!(tile(&board, 3, 5), TileType::L);
    assert_eq!(board.block_count(), 2);
    for y in 0..5 {
        for x in 1..5 {
            assert_eq!(tile(&board, x, y), TileType::Empty, "cell ({x}, {y})");
        }
    }
}

#[test]
fn test_clear_full_top_row_leaves_empty_top() {
    let mut board = Board::new(5, 4);
    fill_row(&mut board, 0, TileType::Z);
    board.set_tile(1, 2, TileType::J);

    assert_eq!(board.clear_full_lines(), 1);
    assert_eq!(tile(&board, 1, 2), TileType::J);
    for x in 1..4 {
        assert_eq!(tile(&board, x, 0), TileType::Empty);
    }
}

#[test]
fn test_floor_row_never_cleared() {
    let mut board = Board::new(5, 4);
    assert!(board.is_row_full(3));
    assert_eq!(board.clear_full_lines(), 0);
    for x in 0..5 {
        assert_eq!(tile(&board, x, 3), TileType::Wall);
    }
}

#[test]
fn test_initialize_restores_layout() {
    let mut board = Board::default();
    fill_row(&mut board, 5, TileType::S);
    board.initialize();
    assert!(board.same_tiles(&Board::default()));
}

#[test]
fn test_rows_round_trip() {
    let mut board = Board::new(6, 5);
    board.set_tile(2, 3, TileType::T);
    let rows = board.rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[3][2], TileType::T);

    let rebuilt = Board::from_tile_rows(6, 5, &rows);
    assert!(rebuilt.same_tiles(&board));
}
