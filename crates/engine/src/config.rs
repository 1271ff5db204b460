use std::env;
use std::path::PathBuf;

use tracing::warn;

use replay_tetris_core::types::is_supported_board_size;
use replay_tetris_core::EngineConfig;
use replay_tetris_persist::PersistConfig;

/// Engine and persistence settings for a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    pub engine: EngineConfig,
    pub persist: PersistConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

impl SessionConfig {
    /// Defaults overridden by `REPLAY_TETRIS_*` environment variables.
    ///
    /// Unset or unparsable values keep the default, as does a board size
    /// outside the supported limits.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let save_dir = env::var("REPLAY_TETRIS_SAVE_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.persist.save_dir);
        let max_replays = env_parse("REPLAY_TETRIS_MAX_REPLAYS")
            .filter(|n: &usize| *n > 0)
            .unwrap_or(defaults.persist.max_replays);

        let board_width =
            env_parse("REPLAY_TETRIS_BOARD_WIDTH").unwrap_or(defaults.engine.board_width);
        let board_height =
            env_parse("REPLAY_TETRIS_BOARD_HEIGHT").unwrap_or(defaults.engine.board_height);
        let (board_width, board_height) = if is_supported_board_size(board_width, board_height) {
            (board_width, board_height)
        } else {
            warn!(board_width, board_height, "unsupported board size, using default");
            (defaults.engine.board_width, defaults.engine.board_height)
        };
        let fps = env_parse("REPLAY_TETRIS_FPS")
            .filter(|n: &u32| *n > 0)
            .unwrap_or(defaults.engine.fps);

        Self {
            engine: EngineConfig {
                board_width,
                board_height,
                fps,
                ..defaults.engine
            },
            persist: PersistConfig {
                save_dir,
                max_replays,
                ..defaults.persist
            },
        }
    }
}
