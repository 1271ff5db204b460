//! Session module - one owner for the RNG, the store and the running engine
//!
//! A [`SessionContext`] holds at most one [`SimulationEngine`]. Starting,
//! resuming or loading a replay fully replaces the previous engine. The
//! session reacts to engine notifications: the autosave timer writes the
//! snapshot file, and game over deletes it and stores a replay.

use tracing::{info, warn};

use replay_tetris_core::types::{EngineEvent, EngineState, GameAction};
use replay_tetris_core::{wall_clock_timestamp, RandomSource, ReplayRecord, SimulationEngine};
use replay_tetris_persist::{GameStore, LoadError, Storage};

use crate::config::SessionConfig;

pub struct SessionContext<S> {
    config: SessionConfig,
    random: RandomSource,
    store: GameStore<S>,
    engine: Option<SimulationEngine>,
    /// Source of the running replay, kept for restarts
    replay: Option<ReplayRecord>,
}

impl<S: Storage> SessionContext<S> {
    pub fn new(storage: S, config: SessionConfig) -> Self {
        let store = GameStore::new(storage, config.persist.clone());
        Self {
            config,
            random: RandomSource::default(),
            store,
            engine: None,
            replay: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> Option<&SimulationEngine> {
        self.engine.as_ref()
    }

    pub fn random(&self) -> &RandomSource {
        &self.random
    }

    pub fn store(&self) -> &GameStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GameStore<S> {
        &mut self.store
    }

    pub fn state(&self) -> Option<EngineState> {
        self.engine.as_ref().map(SimulationEngine::state)
    }

    fn replace(&mut self, engine: SimulationEngine, replay: Option<ReplayRecord>) {
        if self.engine.is_some() {
            info!("replacing running session");
        }
        self.engine = Some(engine);
        self.replay = replay;
    }

    /// Start a live game; a time-derived seed is used when `seed` is `None`.
    ///
    /// Returns the seed in use.
    pub fn start_new_game(&mut self, seed: Option<u64>) -> u64 {
        let seed = seed.unwrap_or_else(RandomSource::time_seed);
        let engine = SimulationEngine::new_game(
            self.config.engine.clone(),
            &mut self.random,
            seed,
            wall_clock_timestamp(),
        );
        self.replace(engine, None);
        seed
    }

    /// Resume from the autosave file. On error the current session is kept.
    pub fn resume_saved_game(&mut self) -> Result<(), LoadError> {
        let snapshot = self.store.load_snapshot()?;
        let engine =
            SimulationEngine::from_snapshot(self.config.engine.clone(), snapshot, &mut self.random)?;
        self.replace(engine, None);
        Ok(())
    }

    /// Resume the autosave, or start a fresh game when it cannot be loaded.
    ///
    /// Returns true when the saved game was resumed.
    pub fn resume_or_start(&mut self) -> bool {
        match self.resume_saved_game() {
            Ok(()) => true,
            Err(LoadError::Storage(err)) if err.is_not_found() => {
                info!("no saved game, starting fresh");
                self.start_new_game(None);
                false
            }
            Err(err) => {
                warn!(error = %err, "saved game unusable, starting fresh");
                self.start_new_game(None);
                false
            }
        }
    }

    /// Write the autosave file now. Only a running or paused live game is saved.
    pub fn save_game(&mut self) -> bool {
        let Some(engine) = self.engine.as_ref() else {
            return false;
        };
        if engine.is_replay() || engine.state().is_over() {
            return false;
        }
        let snapshot = engine.snapshot(&self.random);
        self.store.save_snapshot(&snapshot)
    }

    pub fn load_replay(&mut self, index: usize) -> Result<(), LoadError> {
        let record = self.store.load_replay(index)?;
        let engine =
            SimulationEngine::from_replay(self.config.engine.clone(), &record, &mut self.random);
        self.replace(engine, Some(record));
        Ok(())
    }

    /// Restart the current session: a replay plays again from the start, a
    /// live game restarts with a new seed.
    pub fn restart(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match (&self.replay, engine.is_replay()) {
            (Some(record), true) => engine.restart_replay(&mut self.random, record),
            _ => {
                let seed = RandomSource::time_seed();
                engine.restart(&mut self.random, seed, wall_clock_timestamp());
            }
        }
    }

    /// Drop the running engine without saving
    pub fn close(&mut self) {
        if self.engine.take().is_some() {
            info!("session closed");
        }
        self.replay = None;
    }

    /// Save the live game (if any) and drop the engine
    pub fn save_and_close(&mut self) -> bool {
        let saved = self.save_game();
        self.close();
        saved
    }

    pub fn press(&mut self, action: GameAction) {
        if let Some(engine) = self.engine.as_mut() {
            engine.press(action);
        }
    }

    pub fn release(&mut self, action: GameAction) {
        if let Some(engine) = self.engine.as_mut() {
            engine.release(action);
        }
    }

    pub fn pause(&mut self) -> bool {
        self.engine.as_mut().is_some_and(SimulationEngine::pause)
    }

    pub fn resume(&mut self) -> bool {
        self.engine.as_mut().is_some_and(SimulationEngine::resume)
    }

    /// Advance the engine one frame and handle its notifications.
    ///
    /// Returns the notifications for the presentation layer.
    pub fn tick(&mut self, elapsed_ms: u32) -> Vec<EngineEvent> {
        let Some(engine) = self.engine.as_mut() else {
            return Vec::new();
        };
        let store = &mut self.store;
        engine.tick_with(&mut self.random, elapsed_ms, |snapshot| {
            store.write_snapshot(snapshot)
        });

        let events = engine.take_events();
        if events
            .iter()
            .any(|event| matches!(event, EngineEvent::GameOver { .. }))
        {
            store.remove_snapshot();
            let record = engine.replay_record(store.next_file_index());
            store.save_replay(&record);
        }
        events
    }
}
