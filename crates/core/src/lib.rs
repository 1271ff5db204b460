//! Core simulation - pure, deterministic, and replayable
//!
//! This crate contains the game rules and the record/replay machinery. It has
//! **no I/O**: persistence and presentation live in other crates and talk to
//! the core through plain values ([`GameSnapshot`], [`ReplayRecord`]) and
//! drained notifications ([`types::EngineEvent`]).
//!
//! # Module Structure
//!
//! - [`board`]: walled grid with collision queries and line clearing
//! - [`pieces`]: static rotation tables per piece kind
//! - [`piece`]: a falling or queued piece instance
//! - [`rng`]: seeded weighted piece draws with exportable state
//! - [`clock`]: frame counter independent of wall time
//! - [`timer`]: polled interval timers
//! - [`command`]: recorded commands and the FIFO event log
//! - [`snapshot`]: save and replay value types
//! - [`simulation`]: the per-frame engine tying it all together
//!
//! # Determinism
//!
//! Piece draws are the only source of randomness and each consumes one word
//! from the [`RandomSource`] stream. Replaying the command log of a game
//! against the same seed therefore reproduces it exactly:
//!
//! ```
//! use replay_tetris_core::{EngineConfig, RandomSource, SimulationEngine};
//!
//! let mut rng = RandomSource::default();
//! let mut live = SimulationEngine::new_game(EngineConfig::default(), &mut rng, 42, "start");
//! for _ in 0..120 {
//!     live.tick(&mut rng, 16);
//! }
//! while live.try_move(0, 1) {}
//! live.lock(&mut rng);
//!
//! let record = live.replay_record(0);
//! let mut replay_rng = RandomSource::default();
//! let mut replay = SimulationEngine::from_replay(EngineConfig::default(), &record, &mut replay_rng);
//! while replay.tick(&mut replay_rng, 16) {}
//!
//! assert!(replay.board().same_tiles(live.board()));
//! assert_eq!(replay.score(), live.score());
//! ```

pub mod board;
pub mod clock;
pub mod command;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod simulation;
pub mod snapshot;
pub mod timer;

pub use replay_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Tile};
pub use clock::{wall_clock_timestamp, FrameClock};
pub use command::{Command, CommandKind, EventLog};
pub use piece::{Piece, PieceCells};
pub use pieces::{get_shape, rotation_count, rotation_states, CellOffset, PieceShape};
pub use rng::{RandomSource, RngStateError};
pub use simulation::{EngineConfig, SimulationEngine};
pub use snapshot::{GameSnapshot, ReplayRecord};
pub use timer::Timer;
