//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (simulation, persistence, presentation).
//!
//! # Board Dimensions
//!
//! The default playfield is 30 columns by 20 rows. The bottom row and the
//! leftmost/rightmost columns are permanent walls, so the playable interior is
//! 28 columns wide. Row 0 is the top of the board; a piece locking with any cell
//! in row 0 ends the game.
//!
//! Boards loaded from files or configured at startup must be between
//! `MIN_BOARD_WIDTH` x `MIN_BOARD_HEIGHT` and `MAX_BOARD_DIM` on each side.
//!
//! # Timing Constants
//!
//! Timer intervals are in milliseconds of wall-clock polling time:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_FPS` | 60 | Simulation frames per second |
//! | `MOVE_DOWN_INTERVAL_MS` | 750 | Gravity descent interval |
//! | `SOFT_DROP_INTERVAL_MS` | 50 | Descent interval while soft dropping |
//! | `MOVE_SIDE_INTERVAL_MS` | 50 | Repeat interval for held left/right |
//! | `ROTATE_INTERVAL_MS` | 150 | Repeat interval for held rotate |
//! | `AUTO_SAVE_INTERVAL_MS` | 30000 | Autosave interval |
//!
//! # Piece Weights
//!
//! New pieces are drawn with fixed relative weights: I, O and T are twice as
//! likely as S, Z, J and L.
//!
//! # Examples
//!
//! ```
//! use replay_tetris_types::{GameAction, TileType, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
//!
//! // Parse a persisted tile name (case-insensitive)
//! let parsed = TileType::from_str("t").unwrap();
//! assert_eq!(parsed, TileType::T);
//! assert!(parsed.is_placeable());
//! assert!(!TileType::Wall.is_placeable());
//!
//! // Parse an input action
//! assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
//!
//! assert_eq!(DEFAULT_BOARD_WIDTH, 30);
//! assert_eq!(DEFAULT_BOARD_HEIGHT, 20);
//! ```

/// Default board width in cells, walls included
pub const DEFAULT_BOARD_WIDTH: u16 = 30;

/// Default board height in cells, bottom wall included
pub const DEFAULT_BOARD_HEIGHT: u16 = 20;

/// Smallest usable board: one interior column between the side walls
pub const MIN_BOARD_WIDTH: u16 = 3;

/// Smallest usable board: one interior row above the floor
pub const MIN_BOARD_HEIGHT: u16 = 2;

/// Largest accepted board side, in cells
pub const MAX_BOARD_DIM: u16 = 256;

/// True when a `width` x `height` board is within the accepted limits
pub const fn is_supported_board_size(width: u16, height: u16) -> bool {
    width >= MIN_BOARD_WIDTH
        && height >= MIN_BOARD_HEIGHT
        && width <= MAX_BOARD_DIM
        && height <= MAX_BOARD_DIM
}

/// Simulation frames per second
pub const DEFAULT_FPS: u32 = 60;

/// Gravity interval (750ms per row)
pub const MOVE_DOWN_INTERVAL_MS: u32 = 750;

/// Gravity interval while soft drop is held
pub const SOFT_DROP_INTERVAL_MS: u32 = 50;

/// Auto-repeat interval for held left/right
pub const MOVE_SIDE_INTERVAL_MS: u32 = 50;

/// Auto-repeat interval for held rotate
pub const ROTATE_INTERVAL_MS: u32 = 150;

/// Autosave interval (30 seconds)
pub const AUTO_SAVE_INTERVAL_MS: u32 = 30_000;

/// Points awarded per cleared line
pub const LINE_CLEAR_SCORE: u64 = 100;

/// Maximum number of replay files kept at once
pub const MAX_REPLAY_FILES: usize = 10;

/// One preview slot per this many board rows
pub const PREVIEW_ROWS_PER_SLOT: u16 = 5;

/// Relative draw weights for the placeable piece kinds, in [`TileType::PLACEABLE`] order
pub const PIECE_WEIGHTS: [u32; 7] = [2, 2, 2, 1, 1, 1, 1];


/// Kind of a single board cell
///
/// - **Empty**: free space
/// - **Wall**: permanent border (bottom row, left and right columns)
/// - **I, O, T, S, Z, J, L**: a locked block of that piece kind
///
/// Only the seven piece kinds are placeable; `Empty` and `Wall` never appear
/// as the type of a falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileType {
    #[default]
    Empty,
    Wall,
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl TileType {
    /// Every tile type, in declaration order
    pub const ALL: [TileType; 9] = [
        TileType::Empty,
        TileType::Wall,
        TileType::I,
        TileType::O,
        TileType::T,
        TileType::S,
        TileType::Z,
        TileType::J,
        TileType::L,
    ];

    /// The seven piece kinds, in the order used by [`PIECE_WEIGHTS`]
    pub const PLACEABLE: [TileType; 7] = [
        TileType::I,
        TileType::O,
        TileType::T,
        TileType::S,
        TileType::Z,
        TileType::J,
        TileType::L,
    ];

    /// Parse a tile type from its persisted name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use replay_tetris_types::TileType;
    ///
    /// assert_eq!(TileType::from_str("EMPTY"), Some(TileType::Empty));
    /// assert_eq!(TileType::from_str("wall"), Some(TileType::Wall));
    /// assert_eq!(TileType::from_str("L"), Some(TileType::L));
    /// assert_eq!(TileType::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EMPTY" => Some(TileType::Empty),
            "WALL" => Some(TileType::Wall),
            "I" => Some(TileType::I),
            "O" => Some(TileType::O),
            "T" => Some(TileType::T),
            "S" => Some(TileType::S),
            "Z" => Some(TileType::Z),
            "J" => Some(TileType::J),
            "L" => Some(TileType::L),
            _ => None,
        }
    }

    /// Persisted name of the tile type
    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::Empty => "EMPTY",
            TileType::Wall => "WALL",
            TileType::I => "I",
            TileType::O => "O",
            TileType::T => "T",
            TileType::S => "S",
            TileType::Z => "Z",
            TileType::J => "J",
            TileType::L => "L",
        }
    }

    /// True for the seven piece kinds
    pub fn is_placeable(&self) -> bool {
        !matches!(self, TileType::Empty | TileType::Wall)
    }
}

/// Held-key inputs understood by the simulation engine
///
/// Movement and rotation repeat while held (driven by the engine's timers);
/// soft drop accelerates gravity while held; pause is a one-shot press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Repeatedly move the piece one cell left
    MoveLeft,
    /// Repeatedly move the piece one cell right
    MoveRight,
    /// Repeatedly rotate the piece clockwise
    Rotate,
    /// Accelerate gravity
    SoftDrop,
    /// Pause the live game or the replay
    Pause,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use replay_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "softdrop" => Some(GameAction::SoftDrop),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Rotate => "rotate",
            GameAction::SoftDrop => "softDrop",
            GameAction::Pause => "pause",
        }
    }
}

/// Simulation engine lifecycle state
///
/// A new game starts in `LiveRunning`; a loaded replay starts in
/// `ReplayRunning`. Live and replay states never mix within one engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineState {
    LiveRunning,
    LivePaused,
    LiveGameOver,
    ReplayRunning,
    ReplayPaused,
    ReplayOver,
}

impl EngineState {
    pub fn is_replay(&self) -> bool {
        matches!(
            self,
            EngineState::ReplayRunning | EngineState::ReplayPaused | EngineState::ReplayOver
        )
    }

    pub fn is_running(&self) -> bool {
        matches!(self, EngineState::LiveRunning | EngineState::ReplayRunning)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, EngineState::LivePaused | EngineState::ReplayPaused)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, EngineState::LiveGameOver | EngineState::ReplayOver)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::LiveRunning => "live-running",
            EngineState::LivePaused => "live-paused",
            EngineState::LiveGameOver => "live-game-over",
            EngineState::ReplayRunning => "replay-running",
            EngineState::ReplayPaused => "replay-paused",
            EngineState::ReplayOver => "replay-over",
        }
    }
}

/// Notification emitted by the engine for presentation and persistence layers.
///
/// The engine never calls outward; subscribers drain these after each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// A piece was written onto the board
    PieceLocked {
        kind: TileType,
        lines_cleared: u32,
        score_gained: u64,
    },
    /// A live lock reached the top row
    GameOver { score: u64 },
    /// The replay event log ran dry
    ReplayFinished { score: u64 },
}
