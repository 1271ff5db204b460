//! Format module - JSON shapes of the save and replay files
//!
//! The DTOs here mirror the on-disk key names and are kept separate from the
//! core types. Decoding runs in three steps:
//!
//! 1. parse into a raw `serde_json::Value` and check every required top-level
//!    key is present and non-null ([`LoadError::MissingField`])
//! 2. decode the typed DTO ([`LoadError::Json`] on type mismatches)
//! 3. convert to core types, validating names and geometry
//!    ([`LoadError::InvalidField`])

use serde::{Deserialize, Serialize};
use serde_json::Value;

use replay_tetris_core::types::{is_supported_board_size, TileType, MAX_BOARD_DIM};
use replay_tetris_core::{
    Board, Command, CommandKind, FrameClock, GameSnapshot, Piece, ReplayRecord,
};

use crate::error::LoadError;

/// Top-level keys of the snapshot file, all required
pub const SNAPSHOT_KEYS: [&str; 9] = [
    "map",
    "random_state",
    "game_seed",
    "score",
    "current_piece",
    "next_piece_queue",
    "game_frame_counter",
    "event_queue",
    "game_start_date",
];

/// Top-level keys of a replay file, all required
pub const REPLAY_KEYS: [&str; 7] = [
    "map_size",
    "game_start_date",
    "game_finished_time",
    "file_index",
    "score",
    "game_seed",
    "events",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDto {
    pub tile_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDto {
    pub width: u16,
    pub height: u16,
    /// Rows top to bottom
    pub tile_map: Vec<Vec<TileDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceDto {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub rotation: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounterDto {
    pub frame_count: u64,
    pub fps: u32,
}

/// `{"frame", "type", "dx"?, "dy"?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDto {
    pub frame: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dy: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub map: MapDto,
    pub random_state: String,
    pub game_seed: u64,
    pub score: u64,
    pub current_piece: PieceDto,
    pub next_piece_queue: Vec<PieceDto>,
    pub game_frame_counter: FrameCounterDto,
    pub event_queue: Vec<CommandDto>,
    pub game_start_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFile {
    /// `[width, height]`
    pub map_size: [u16; 2],
    pub game_start_date: String,
    pub game_finished_time: String,
    pub file_index: usize,
    pub score: u64,
    pub game_seed: u64,
    pub events: Vec<CommandDto>,
}

// ============== Core -> DTO ==============

impl From<&Board> for MapDto {
    fn from(board: &Board) -> Self {
        let tile_map = board
            .rows()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|tile_type| TileDto {
                        tile_type: tile_type.as_str().to_string(),
                    })
                    .collect()
            })
            .collect();
        Self {
            width: board.width(),
            height: board.height(),
            tile_map,
        }
    }
}

impl From<&Piece> for PieceDto {
    fn from(piece: &Piece) -> Self {
        Self {
            x: piece.x,
            y: piece.y,
            kind: piece.kind().as_str().to_string(),
            rotation: piece.rotation() as i64,
        }
    }
}

impl From<&FrameClock> for FrameCounterDto {
    fn from(clock: &FrameClock) -> Self {
        Self {
            frame_count: clock.frame_count(),
            fps: clock.fps(),
        }
    }
}

impl From<&Command> for CommandDto {
    fn from(command: &Command) -> Self {
        let (dx, dy) = match command.kind {
            CommandKind::Move { dx, dy } => (Some(dx), Some(dy)),
            _ => (None, None),
        };
        Self {
            frame: command.frame,
            kind: command.kind.type_name().to_string(),
            dx,
            dy,
        }
    }
}

impl From<&GameSnapshot> for SnapshotFile {
    fn from(snapshot: &GameSnapshot) -> Self {
        Self {
            map: MapDto::from(&snapshot.board),
            random_state: snapshot.random_state.clone(),
            game_seed: snapshot.seed,
            score: snapshot.score,
            current_piece: PieceDto::from(&snapshot.current_piece),
            next_piece_queue: snapshot.next_pieces.iter().map(PieceDto::from).collect(),
            game_frame_counter: FrameCounterDto::from(&snapshot.clock),
            event_queue: snapshot.events.iter().map(CommandDto::from).collect(),
            game_start_date: snapshot.start_date.clone(),
        }
    }
}

impl From<&ReplayRecord> for ReplayFile {
    fn from(record: &ReplayRecord) -> Self {
        Self {
            map_size: [record.board_width, record.board_height],
            game_start_date: record.start_date.clone(),
            game_finished_time: record.finished_time.clone(),
            file_index: record.file_index,
            score: record.score,
            game_seed: record.seed,
            events: record.events.iter().map(CommandDto::from).collect(),
        }
    }
}

// ============== DTO -> Core ==============

fn parse_tile_type(field: &'static str, name: &str) -> Result<TileType, LoadError> {
    TileType::from_str(name)
        .ok_or_else(|| LoadError::invalid(field, format!("unknown tile type {name:?}")))
}

fn check_board_size(field: &'static str, width: u16, height: u16) -> Result<(), LoadError> {
    if is_supported_board_size(width, height) {
        Ok(())
    } else {
        Err(LoadError::invalid(
            field,
            format!("board {width}x{height} is outside the supported size"),
        ))
    }
}

/// Coordinates and offsets must stay within one board side of the origin
fn check_coordinate(field: &'static str, name: &str, value: i32) -> Result<(), LoadError> {
    let limit = i32::from(MAX_BOARD_DIM);
    if (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(LoadError::invalid(field, format!("{name} {value} is out of range")))
    }
}

impl MapDto {
    pub fn to_board(&self) -> Result<Board, LoadError> {
        check_board_size("map", self.width, self.height)?;
        let rows = self
            .tile_map
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| parse_tile_type("map", &tile.tile_type))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Board::from_tile_rows(self.width, self.height, &rows))
    }
}

impl PieceDto {
    pub fn to_piece(&self, field: &'static str) -> Result<Piece, LoadError> {
        let kind = parse_tile_type(field, &self.kind)?;
        check_coordinate(field, "x", self.x)?;
        check_coordinate(field, "y", self.y)?;
        Piece::with_rotation(self.x, self.y, kind, self.rotation)
            .ok_or_else(|| LoadError::invalid(field, format!("{} is not a piece kind", self.kind)))
    }
}

impl CommandDto {
    /// Unknown types decode to [`CommandKind::Unknown`]; a move without
    /// `dx`/`dy` is invalid.
    pub fn to_command(&self, field: &'static str) -> Result<Command, LoadError> {
        let kind = match self.kind.as_str() {
            "move" => match (self.dx, self.dy) {
                (Some(dx), Some(dy)) => {
                    check_coordinate(field, "dx", dx)?;
                    check_coordinate(field, "dy", dy)?;
                    CommandKind::Move { dx, dy }
                }
                _ => {
                    return Err(LoadError::invalid(
                        field,
                        format!("move at frame {} lacks dx/dy", self.frame),
                    ))
                }
            },
            "rotate" => CommandKind::Rotate,
            "lock_piece" => CommandKind::LockPiece,
            other => CommandKind::Unknown(other.to_string()),
        };
        Ok(Command::new(self.frame, kind))
    }
}

fn to_commands(field: &'static str, commands: &[CommandDto]) -> Result<Vec<Command>, LoadError> {
    commands.iter().map(|c| c.to_command(field)).collect()
}

impl TryFrom<SnapshotFile> for GameSnapshot {
    type Error = LoadError;

    fn try_from(file: SnapshotFile) -> Result<Self, Self::Error> {
        let next_pieces = file
            .next_piece_queue
            .iter()
            .map(|p| p.to_piece("next_piece_queue"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GameSnapshot {
            board: file.map.to_board()?,
            random_state: file.random_state,
            seed: file.game_seed,
            score: file.score,
            current_piece: file.current_piece.to_piece("current_piece")?,
            next_pieces,
            clock: FrameClock::with_frames(
                file.game_frame_counter.frame_count,
                file.game_frame_counter.fps,
            ),
            events: to_commands("event_queue", &file.event_queue)?,
            start_date: file.game_start_date,
        })
    }
}

impl TryFrom<ReplayFile> for ReplayRecord {
    type Error = LoadError;

    fn try_from(file: ReplayFile) -> Result<Self, Self::Error> {
        let [board_width, board_height] = file.map_size;
        check_board_size("map_size", board_width, board_height)?;
        Ok(ReplayRecord {
            board_width,
            board_height,
            start_date: file.game_start_date,
            finished_time: file.game_finished_time,
            file_index: file.file_index,
            score: file.score,
            seed: file.game_seed,
            events: to_commands("events", &file.events)?,
        })
    }
}

// ============== Bytes ==============

/// Parse `bytes` as a JSON object and check that every key in `required` is
/// present and non-null.
pub fn parse_checked(bytes: &[u8], required: &[&'static str]) -> Result<Value, LoadError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Some(object) = value.as_object() else {
        return Err(LoadError::invalid("<root>", "expected a JSON object"));
    };
    for &key in required {
        if object.get(key).map_or(true, Value::is_null) {
            return Err(LoadError::MissingField(key));
        }
    }
    Ok(value)
}

pub fn encode_snapshot(snapshot: &GameSnapshot) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&SnapshotFile::from(snapshot))
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<GameSnapshot, LoadError> {
    let value = parse_checked(bytes, &SNAPSHOT_KEYS)?;
    let file: SnapshotFile = serde_json::from_value(value)?;
    GameSnapshot::try_from(file)
}

pub fn encode_replay(record: &ReplayRecord) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&ReplayFile::from(record))
}

pub fn decode_replay(bytes: &[u8]) -> Result<ReplayRecord, LoadError> {
    let value = parse_checked(bytes, &REPLAY_KEYS)?;
    let file: ReplayFile = serde_json::from_value(value)?;
    ReplayRecord::try_from(file)
}
