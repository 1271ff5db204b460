//! File layout of the save directory

use std::path::PathBuf;

use replay_tetris_core::types::MAX_REPLAY_FILES;

const REPLAY_FILE_PREFIX: &str = "game_replay_data_";
const REPLAY_FILE_SUFFIX: &str = ".json";

/// Where saves and replays live, relative to `save_dir`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistConfig {
    pub save_dir: PathBuf,
    pub snapshot_file: String,
    pub replay_dir: String,
    pub max_replays: usize,
}

impl PersistConfig {
    pub fn with_save_dir(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            ..Self::default()
        }
    }

    /// `game_replay_data_{index}.json`
    pub fn replay_file_name(index: usize) -> String {
        format!("{REPLAY_FILE_PREFIX}{index}{REPLAY_FILE_SUFFIX}")
    }

    /// Numeric index of a replay file name, if it follows the pattern
    pub fn parse_replay_index(file_name: &str) -> Option<usize> {
        file_name
            .strip_prefix(REPLAY_FILE_PREFIX)?
            .strip_suffix(REPLAY_FILE_SUFFIX)?
            .parse()
            .ok()
    }

    /// Storage path of the replay with `index`
    pub fn replay_path(&self, index: usize) -> String {
        format!("{}/{}", self.replay_dir, Self::replay_file_name(index))
    }

    pub fn replay_entry_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.replay_dir, file_name)
    }
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("saves"),
            snapshot_file: "game_data.json".to_string(),
            replay_dir: "replay_json".to_string(),
            max_replays: MAX_REPLAY_FILES,
        }
    }
}
