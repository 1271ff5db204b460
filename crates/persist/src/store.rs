//! Store module - snapshot and replay files on top of a [`Storage`]
//!
//! Boolean helpers (`save_snapshot`, `save_replay`, `remove_snapshot`) log
//! their failure and never panic, so a broken disk costs a save, not the game.

use tracing::{debug, info, warn};

use replay_tetris_core::{GameSnapshot, ReplayRecord};

use crate::config::PersistConfig;
use crate::error::{LoadError, SaveError};
use crate::format::{decode_replay, decode_snapshot, encode_replay, encode_snapshot};
use crate::storage::Storage;

#[derive(Debug, Clone)]
pub struct GameStore<S> {
    storage: S,
    config: PersistConfig,
}

impl<S: Storage> GameStore<S> {
    pub fn new(storage: S, config: PersistConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    // Snapshot

    pub fn write_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<(), SaveError> {
        let bytes = encode_snapshot(snapshot)?;
        self.storage.write(&self.config.snapshot_file, &bytes)?;
        Ok(())
    }

    /// Write the autosave file; false (logged) on failure
    pub fn save_snapshot(&mut self, snapshot: &GameSnapshot) -> bool {
        match self.write_snapshot(snapshot) {
            Ok(()) => {
                debug!(
                    path = %self.config.snapshot_file,
                    frame = snapshot.clock.frame_count(),
                    "game saved"
                );
                true
            }
            Err(err) => {
                warn!(path = %self.config.snapshot_file, error = %err, "failed to save game");
                false
            }
        }
    }

    pub fn has_snapshot(&self) -> bool {
        self.storage.exists(&self.config.snapshot_file)
    }

    pub fn load_snapshot(&self) -> Result<GameSnapshot, LoadError> {
        let bytes = self.storage.read(&self.config.snapshot_file)?;
        decode_snapshot(&bytes)
    }

    /// Delete the autosave file. True when no autosave remains.
    pub fn remove_snapshot(&mut self) -> bool {
        match self.storage.remove(&self.config.snapshot_file) {
            Ok(()) => true,
            Err(err) if err.is_not_found() => true,
            Err(err) => {
                warn!(path = %self.config.snapshot_file, error = %err, "failed to remove saved game");
                false
            }
        }
    }

    // Replays

    fn replay_file_names(&self) -> Vec<String> {
        match self.storage.list(&self.config.replay_dir) {
            Ok(names) => names.into_iter().filter(|n| n.ends_with(".json")).collect(),
            Err(err) => {
                warn!(dir = %self.config.replay_dir, error = %err, "failed to list replays");
                Vec::new()
            }
        }
    }

    /// Index for the next replay: the number of `.json` files already stored
    pub fn next_file_index(&self) -> usize {
        self.replay_file_names().len()
    }

    pub fn write_replay(&mut self, record: &ReplayRecord) -> Result<(), SaveError> {
        let bytes = encode_replay(record)?;
        self.storage
            .write(&self.config.replay_path(record.file_index), &bytes)?;
        if record.file_index >= self.config.max_replays {
            self.rotate_replays()?;
        }
        Ok(())
    }

    /// Store `record` under its `file_index`, evicting the oldest replay once
    /// the cap is exceeded. False (logged) on failure.
    pub fn save_replay(&mut self, record: &ReplayRecord) -> bool {
        match self.write_replay(record) {
            Ok(()) => {
                info!(
                    file_index = record.file_index,
                    score = record.score,
                    events = record.event_count(),
                    "replay saved"
                );
                true
            }
            Err(err) => {
                warn!(file_index = record.file_index, error = %err, "failed to save replay");
                false
            }
        }
    }

    /// Drop index 0 and renumber the rest contiguously from 0.
    ///
    /// Each renamed file has its `file_index` rewritten to match its name.
    fn rotate_replays(&mut self) -> Result<(), SaveError> {
        let oldest = self.config.replay_path(0);
        match self.storage.remove(&oldest) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err.into()),
        }

        let mut indexed: Vec<(usize, String)> = self
            .replay_file_names()
            .into_iter()
            .filter_map(|name| PersistConfig::parse_replay_index(&name).map(|i| (i, name)))
            .collect();
        indexed.sort_by_key(|(index, _)| *index);

        for (new_index, (old_index, name)) in indexed.into_iter().enumerate() {
            if new_index == old_index {
                continue;
            }
            let from = self.config.replay_entry_path(&name);
            let to = self.config.replay_path(new_index);
            self.renumber(&from, &to, new_index)?;
            debug!(from = %from, to = %to, "replay renumbered");
        }
        info!(max = self.config.max_replays, "oldest replay evicted");
        Ok(())
    }

    fn renumber(&mut self, from: &str, to: &str, new_index: usize) -> Result<(), SaveError> {
        let bytes = self.storage.read(from)?;
        match decode_replay(&bytes) {
            Ok(mut record) => {
                record.file_index = new_index;
                let bytes = encode_replay(&record)?;
                self.storage.write(to, &bytes)?;
                self.storage.remove(from)?;
            }
            Err(err) => {
                // Keep unreadable files in sequence; their contents are left alone.
                warn!(path = from, error = %err, "renumbering unreadable replay");
                self.storage.rename(from, to)?;
            }
        }
        Ok(())
    }

    pub fn load_replay(&self, index: usize) -> Result<ReplayRecord, LoadError> {
        let bytes = self.storage.read(&self.config.replay_path(index))?;
        decode_replay(&bytes)
    }

    /// Every readable replay, best score first. Unreadable files are skipped.
    pub fn list_replays(&self) -> Vec<ReplayRecord> {
        let mut records: Vec<ReplayRecord> = self
            .replay_file_names()
            .into_iter()
            .filter(|name| PersistConfig::parse_replay_index(name).is_some())
            .filter_map(|name| {
                let path = self.config.replay_entry_path(&name);
                let loaded = self
                    .storage
                    .read(&path)
                    .map_err(LoadError::from)
                    .and_then(|bytes| decode_replay(&bytes));
                match loaded {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!(path = %path, error = %err, "skipping unreadable replay");
                        None
                    }
                }
            })
            .collect();
        records.sort_by(|a, b| b.score.cmp(&a.score).then(a.file_index.cmp(&b.file_index)));
        records
    }
}
