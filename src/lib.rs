//! Replay Tetris (workspace facade crate).
//!
//! Re-exports the member crates as `replay_tetris::{types, core, persist, engine}`
//! so binaries, tests and benches depend on a single package.

pub use replay_tetris_core as core;
pub use replay_tetris_engine as engine;
pub use replay_tetris_persist as persist;
pub use replay_tetris_types as types;
