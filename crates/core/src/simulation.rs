//! Simulation module - the per-frame game loop
//!
//! [`SimulationEngine`] owns the board, the falling piece, the preview queue,
//! the frame clock and the command log for one session. The piece RNG is not
//! owned here: every call that may draw a piece takes the session's
//! [`RandomSource`] explicitly.
//!
//! Within one live tick the evaluation order is fixed:
//! descent, left repeat, right repeat, rotate repeat, autosave, frame tick.
//! A lock triggered by descent therefore draws its new piece and clears its
//! lines before the frame counter advances.

use std::collections::VecDeque;
use std::fmt::Display;

use tracing::{debug, info, trace, warn};

use crate::board::Board;
use crate::clock::FrameClock;
use crate::command::{Command, CommandKind, EventLog};
use crate::piece::Piece;
use crate::rng::{RandomSource, RngStateError};
use crate::snapshot::{GameSnapshot, ReplayRecord};
use crate::timer::Timer;
use crate::types::*;

/// Board geometry, frame rate and timer intervals for a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub board_width: u16,
    pub board_height: u16,
    pub fps: u32,
    pub move_down_interval_ms: u32,
    pub soft_drop_interval_ms: u32,
    pub move_side_interval_ms: u32,
    pub rotate_interval_ms: u32,
    pub autosave_interval_ms: u32,
}

impl EngineConfig {
    /// Number of queued preview pieces for this board height. Boards shorter
    /// than one slot have no preview and draw each piece at lock time.
    pub fn preview_len(&self) -> usize {
        (self.board_height / PREVIEW_ROWS_PER_SLOT) as usize
    }

    /// Descent acceleration applied while soft drop is held
    pub fn soft_drop_factor(&self) -> f32 {
        self.move_down_interval_ms as f32 / self.soft_drop_interval_ms.max(1) as f32
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            fps: DEFAULT_FPS,
            move_down_interval_ms: MOVE_DOWN_INTERVAL_MS,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            move_side_interval_ms: MOVE_SIDE_INTERVAL_MS,
            rotate_interval_ms: ROTATE_INTERVAL_MS,
            autosave_interval_ms: AUTO_SAVE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone)]
struct Timers {
    descent: Timer,
    move_left: Timer,
    move_right: Timer,
    rotate: Timer,
    autosave: Timer,
}

impl Timers {
    fn new(config: &EngineConfig) -> Self {
        Self {
            descent: Timer::new("descent", config.move_down_interval_ms),
            move_left: Timer::new("move_left", config.move_side_interval_ms),
            move_right: Timer::new("move_right", config.move_side_interval_ms),
            rotate: Timer::new("rotate", config.rotate_interval_ms),
            autosave: Timer::new("autosave", config.autosave_interval_ms),
        }
    }

    fn all_mut(&mut self) -> [&mut Timer; 5] {
        [
            &mut self.descent,
            &mut self.move_left,
            &mut self.move_right,
            &mut self.rotate,
            &mut self.autosave,
        ]
    }

    fn start_all(&mut self) {
        for timer in self.all_mut() {
            timer.start();
        }
    }

    fn stop_all(&mut self) {
        for timer in self.all_mut() {
            timer.stop();
        }
    }
}

/// Keys currently held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct HeldInputs {
    move_left: bool,
    move_right: bool,
    rotate: bool,
    soft_drop: bool,
}

/// One live or replay session
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: EngineConfig,
    board: Board,
    current: Piece,
    next_queue: VecDeque<Piece>,
    preview_len: usize,
    clock: FrameClock,
    log: EventLog,
    score: u64,
    seed: u64,
    start_date: String,
    state: EngineState,
    timers: Timers,
    held: HeldInputs,
    /// Notifications not yet taken by the owner
    events: Vec<EngineEvent>,
}

impl SimulationEngine {
    /// Start a live game. Reseeds `rng` with `seed` before drawing pieces.
    pub fn new_game(
        config: EngineConfig,
        rng: &mut RandomSource,
        seed: u64,
        start_date: impl Into<String>,
    ) -> Self {
        rng.seed(seed);
        let board = Board::new(config.board_width, config.board_height);
        let mut engine = Self::fresh(config, board, rng, seed, start_date.into());
        engine.state = EngineState::LiveRunning;
        engine.timers.start_all();
        info!(seed, "live game started");
        engine
    }

    /// Resume a live game from a snapshot.
    ///
    /// The snapshot's random state is validated before `rng` is touched, so on
    /// error the caller's RNG is unchanged.
    pub fn from_snapshot(
        config: EngineConfig,
        snapshot: GameSnapshot,
        rng: &mut RandomSource,
    ) -> Result<Self, RngStateError> {
        let mut restored = RandomSource::new(snapshot.seed);
        restored.import_state(&snapshot.random_state)?;
        *rng = restored;

        let config = EngineConfig {
            board_width: snapshot.board.width(),
            board_height: snapshot.board.height(),
            fps: snapshot.clock.fps(),
            ..config
        };
        let preview_len = snapshot.next_pieces.len();
        let mut timers = Timers::new(&config);
        timers.start_all();

        info!(
            seed = snapshot.seed,
            frame = snapshot.clock.frame_count(),
            score = snapshot.score,
            "live game resumed"
        );
        Ok(Self {
            config,
            board: snapshot.board,
            current: snapshot.current_piece,
            next_queue: snapshot.next_pieces.into(),
            preview_len,
            clock: snapshot.clock,
            log: snapshot.events.into(),
            score: snapshot.score,
            seed: snapshot.seed,
            start_date: snapshot.start_date,
            state: EngineState::LiveRunning,
            timers,
            held: HeldInputs::default(),
            events: Vec::new(),
        })
    }

    /// Prepare playback of a finished game from frame 0
    pub fn from_replay(config: EngineConfig, record: &ReplayRecord, rng: &mut RandomSource) -> Self {
        rng.seed(record.seed);
        let config = EngineConfig {
            board_width: record.board_width,
            board_height: record.board_height,
            ..config
        };
        let board = Board::new(config.board_width, config.board_height);
        let mut engine = Self::fresh(config, board, rng, record.seed, record.start_date.clone());
        engine.log = record.events.iter().cloned().collect();
        engine.state = EngineState::ReplayRunning;
        info!(
            seed = record.seed,
            file_index = record.file_index,
            events = record.event_count(),
            "replay loaded"
        );
        engine
    }

    fn fresh(
        config: EngineConfig,
        board: Board,
        rng: &mut RandomSource,
        seed: u64,
        start_date: String,
    ) -> Self {
        let spawn_x = i32::from(board.width()) / 2;
        let current = Piece::spawn(spawn_x, 0, rng.draw_weighted_piece_type());
        let preview_len = config.preview_len();
        let next_queue = (0..preview_len)
            .map(|_| Piece::spawn(spawn_x, 0, rng.draw_weighted_piece_type()))
            .collect();
        let clock = FrameClock::new(config.fps);
        let timers = Timers::new(&config);

        Self {
            config,
            board,
            current,
            next_queue,
            preview_len,
            clock,
            log: EventLog::new(),
            score: 0,
            seed,
            start_date,
            state: EngineState::LiveRunning,
            timers,
            held: HeldInputs::default(),
            events: Vec::new(),
        }
    }

    /// Throw the session away and start a new live game
    pub fn restart(&mut self, rng: &mut RandomSource, seed: u64, start_date: impl Into<String>) {
        *self = Self::new_game(self.config.clone(), rng, seed, start_date);
    }

    /// Play `record` again from its first frame
    pub fn restart_replay(&mut self, rng: &mut RandomSource, record: &ReplayRecord) {
        *self = Self::from_replay(self.config.clone(), record, rng);
    }

    // Accessors

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for presentation bookkeeping (dirty flags) and
    /// scripted setups
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.next_queue.iter()
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_replay(&self) -> bool {
        self.state.is_replay()
    }

    /// Drain pending notifications in emission order
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // Movement

    fn fits(&self, piece: &Piece) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y)| !self.board.is_blocked(x, y))
    }

    fn record(&mut self, command: Command) {
        if !self.state.is_replay() {
            self.log.push(command);
        }
    }

    /// Move the current piece by `(dx, dy)` if every cell lands free.
    ///
    /// Leaves the piece untouched on failure, including when paused or over
    /// and when the offset would overflow. Successful live moves are logged.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let Some(moved) = self.current.translated(dx, dy) else {
            return false;
        };
        if !self.fits(&moved) {
            return false;
        }
        self.current = moved;
        self.record(Command::move_by(self.clock.frame_count(), dx, dy));
        true
    }

    /// Rotate the current piece clockwise if the new state fits (no kicks)
    pub fn try_rotate(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let mut rotated = self.current;
        rotated.rotate_cw();
        if !self.fits(&rotated) {
            return false;
        }
        self.current = rotated;
        self.record(Command::rotate(self.clock.frame_count()));
        true
    }

    /// Write the current piece into the board and bring in the next one.
    ///
    /// A live lock touching row 0 ends the game instead of drawing. Does
    /// nothing while paused or over.
    pub fn lock(&mut self, rng: &mut RandomSource) {
        if !self.state.is_running() {
            return;
        }
        self.record(Command::lock_piece(self.clock.frame_count()));

        let piece = self.current;
        let mut reached_top = false;
        for (x, y) in piece.cells() {
            reached_top |= y == 0;
            self.board.set_tile(x, y, piece.kind());
        }

        if reached_top && !self.state.is_replay() {
            self.events.push(EngineEvent::PieceLocked {
                kind: piece.kind(),
                lines_cleared: 0,
                score_gained: 0,
            });
            self.game_over();
            return;
        }

        let spawn_x = i32::from(self.board.width()) / 2;
        self.current = match self.next_queue.pop_front() {
            Some(next) => next,
            None => Piece::spawn(spawn_x, 0, rng.draw_weighted_piece_type()),
        };
        while self.next_queue.len() < self.preview_len {
            self.next_queue
                .push_back(Piece::spawn(spawn_x, 0, rng.draw_weighted_piece_type()));
        }

        let lines = self.board.clear_full_lines();
        let gained = lines as u64 * LINE_CLEAR_SCORE;
        self.score += gained;
        if lines > 0 {
            debug!(lines, score = self.score, "lines cleared");
        }
        self.events.push(EngineEvent::PieceLocked {
            kind: piece.kind(),
            lines_cleared: lines as u32,
            score_gained: gained,
        });
    }

    fn game_over(&mut self) {
        self.state = EngineState::LiveGameOver;
        self.timers.stop_all();
        self.held = HeldInputs::default();
        info!(
            score = self.score,
            frame = self.clock.frame_count(),
            events = self.log.len(),
            "game over"
        );
        self.events.push(EngineEvent::GameOver { score: self.score });
    }

    /// Where the current piece would land if dropped straight down
    pub fn ghost_piece(&self) -> Piece {
        let floor = i32::from(self.board.height());
        let mut ghost = self.current;
        // A piece outside the walls never lands; stop once it has left the board.
        while ghost.cells().iter().any(|&(_, y)| y < floor) {
            match ghost.translated(0, 1) {
                Some(below) if self.fits(&below) => ghost = below,
                _ => break,
            }
        }
        ghost
    }

    /// Execute one command against the board.
    ///
    /// A failed move or rotation is ignored. Unknown commands do nothing.
    pub fn apply(&mut self, command: &Command, rng: &mut RandomSource) {
        match &command.kind {
            CommandKind::Move { dx, dy } => {
                self.try_move(*dx, *dy);
            }
            CommandKind::Rotate => {
                self.try_rotate();
            }
            CommandKind::LockPiece => self.lock(rng),
            CommandKind::Unknown(name) => {
                trace!(frame = command.frame, kind = %name, "skipping unknown command");
            }
        }
    }

    // Input and lifecycle

    /// Key down. Ignored unless running; only `Pause` is honoured in replay.
    pub fn press(&mut self, action: GameAction) {
        match (self.state, action) {
            (EngineState::LiveRunning | EngineState::ReplayRunning, GameAction::Pause) => {
                self.pause();
            }
            (EngineState::LiveRunning, GameAction::MoveLeft) => {
                self.held.move_left = true;
                self.held.move_right = false;
            }
            (EngineState::LiveRunning, GameAction::MoveRight) => {
                self.held.move_right = true;
                self.held.move_left = false;
            }
            (EngineState::LiveRunning, GameAction::Rotate) => self.held.rotate = true,
            (EngineState::LiveRunning, GameAction::SoftDrop) => {
                self.held.soft_drop = true;
                self.timers
                    .descent
                    .set_acceleration(self.config.soft_drop_factor());
            }
            _ => {}
        }
    }

    /// Key up. Releasing is honoured in any live state so no key stays stuck
    /// across a pause.
    pub fn release(&mut self, action: GameAction) {
        if self.state.is_replay() {
            return;
        }
        match action {
            GameAction::MoveLeft => self.held.move_left = false,
            GameAction::MoveRight => self.held.move_right = false,
            GameAction::Rotate => self.held.rotate = false,
            GameAction::SoftDrop => {
                self.held.soft_drop = false;
                self.timers.descent.reset_acceleration();
            }
            GameAction::Pause => {}
        }
    }

    pub fn pause(&mut self) -> bool {
        self.state = match self.state {
            EngineState::LiveRunning => EngineState::LivePaused,
            EngineState::ReplayRunning => EngineState::ReplayPaused,
            _ => return false,
        };
        debug!(state = self.state.as_str(), "paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        self.state = match self.state {
            EngineState::LivePaused => EngineState::LiveRunning,
            EngineState::ReplayPaused => EngineState::ReplayRunning,
            _ => return false,
        };
        debug!(state = self.state.as_str(), "resumed");
        true
    }

    // Tick

    /// Advance one frame without autosave. Returns false when nothing ran
    /// (paused or over).
    pub fn tick(&mut self, rng: &mut RandomSource, elapsed_ms: u32) -> bool {
        self.tick_with(rng, elapsed_ms, |_| Ok::<(), std::convert::Infallible>(()))
    }

    /// Advance one frame; `autosave` receives a fresh snapshot whenever the
    /// autosave timer fires. A failing autosave is logged and retried on the
    /// next interval.
    pub fn tick_with<E, F>(&mut self, rng: &mut RandomSource, elapsed_ms: u32, autosave: F) -> bool
    where
        E: Display,
        F: FnOnce(&GameSnapshot) -> Result<(), E>,
    {
        match self.state {
            EngineState::LiveRunning => {
                self.live_tick(rng, elapsed_ms, autosave);
                true
            }
            EngineState::ReplayRunning => {
                self.replay_tick(rng);
                true
            }
            _ => false,
        }
    }

    fn live_tick<E, F>(&mut self, rng: &mut RandomSource, elapsed_ms: u32, autosave: F)
    where
        E: Display,
        F: FnOnce(&GameSnapshot) -> Result<(), E>,
    {
        if self.timers.descent.update(elapsed_ms) && !self.try_move(0, 1) {
            self.lock(rng);
        }

        if self.held.move_left {
            if self.timers.move_left.update(elapsed_ms) {
                self.try_move(-1, 0);
            }
        } else {
            self.timers.move_left.accumulate(elapsed_ms);
        }

        if self.held.move_right {
            if self.timers.move_right.update(elapsed_ms) {
                self.try_move(1, 0);
            }
        } else {
            self.timers.move_right.accumulate(elapsed_ms);
        }

        if self.held.rotate {
            if self.timers.rotate.update(elapsed_ms) {
                self.try_rotate();
            }
        } else {
            self.timers.rotate.accumulate(elapsed_ms);
        }

        if self.timers.autosave.update(elapsed_ms) {
            let snapshot = self.snapshot(rng);
            if let Err(err) = autosave(&snapshot) {
                warn!(
                    timer = self.timers.autosave.name(),
                    error = %err,
                    "autosave failed"
                );
            }
        }

        self.clock.tick();
    }

    fn replay_tick(&mut self, rng: &mut RandomSource) {
        self.clock.tick();
        let frame = self.clock.frame_count();
        while let Some(command) = self.log.pop_due(frame) {
            self.apply(&command, rng);
        }
        if self.log.is_empty() {
            self.state = EngineState::ReplayOver;
            info!(score = self.score, frame, "replay finished");
            self.events.push(EngineEvent::ReplayFinished { score: self.score });
        }
    }

    // Persistence views

    /// Capture everything needed to resume, including the RNG position
    pub fn snapshot(&self, rng: &RandomSource) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            random_state: rng.export_state(),
            seed: self.seed,
            score: self.score,
            current_piece: self.current,
            next_pieces: self.next_queue.iter().copied().collect(),
            clock: self.clock,
            events: self.log.to_vec(),
            start_date: self.start_date.clone(),
        }
    }

    /// The replay of this game, to be stored under `file_index`
    pub fn replay_record(&self, file_index: usize) -> ReplayRecord {
        ReplayRecord {
            board_width: self.board.width(),
            board_height: self.board.height(),
            start_date: self.start_date.clone(),
            finished_time: self.clock.time_parts(),
            file_index,
            score: self.score,
            seed: self.seed,
            events: self.log.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_engine(seed: u64) -> (SimulationEngine, RandomSource) {
        let mut rng = RandomSource::default();
        let engine =
            SimulationEngine::new_game(EngineConfig::default(), &mut rng, seed, "2024-01-01 00:00:00");
        (engine, rng)
    }

    fn drop_and_lock(engine: &mut SimulationEngine, rng: &mut RandomSource) {
        while engine.try_move(0, 1) {}
        engine.lock(rng);
    }

    fn drop_at(engine: &mut SimulationEngine, rng: &mut RandomSource, dx: i32) {
        engine.try_move(dx, 0);
        drop_and_lock(engine, rng);
    }

    #[test]
    fn test_new_game_layout() {
        let (engine, _) = new_engine(42);
        assert_eq!(engine.state(), EngineState::LiveRunning);
        assert_eq!(engine.next_pieces().count(), 4);
        assert_eq!(engine.current_piece().x, 15);
        assert_eq!(engine.current_piece().y, 0);
        assert_eq!(engine.score(), 0);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let (a, _) = new_engine(7);
        let (b, _) = new_engine(7);
        assert_eq!(a.current_piece(), b.current_piece());
        assert!(a.next_pieces().eq(b.next_pieces()));
    }

    #[test]
    fn test_drop_and_lock_advances_queue() {
        let (mut engine, mut rng) = new_engine(42);
        let head = *engine.next_pieces().next().unwrap();
        let kind = engine.current_piece().kind();

        drop_and_lock(&mut engine, &mut rng);

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.current_piece(), &head);
        assert_eq!(engine.next_pieces().count(), 4);
        assert_eq!(engine.board().block_count(), 4);
        assert_eq!(
            engine.take_events(),
            vec![EngineEvent::PieceLocked {
                kind,
                lines_cleared: 0,
                score_gained: 0
            }]
        );
        let last = engine.log().iter().last().unwrap();
        assert_eq!(last.kind, CommandKind::LockPiece);
    }

    #[test]
    fn test_failed_move_is_atomic_and_unlogged() {
        let (mut engine, _) = new_engine(3);
        while engine.try_move(-1, 0) {}
        let before = *engine.current_piece();
        let logged = engine.log().len();
        assert!(!engine.try_move(-1, 0));
        assert_eq!(engine.current_piece(), &before);
        assert_eq!(engine.log().len(), logged);
    }

    #[test]
    fn test_lock_at_top_is_game_over() {
        let (mut engine, mut rng) = new_engine(42);
        engine.lock(&mut rng);
        assert_eq!(engine.state(), EngineState::LiveGameOver);
        let events = engine.take_events();
        assert!(matches!(events.last(), Some(EngineEvent::GameOver { score: 0 })));
        assert!(!engine.tick(&mut rng, 1_000));
        assert_eq!(engine.log().to_vec(), vec![Command::lock_piece(0)]);
    }

    #[test]
    fn test_lock_after_game_over_is_ignored() {
        let (mut engine, mut rng) = new_engine(42);
        engine.lock(&mut rng);
        engine.take_events();
        let board = engine.board().clone();
        let piece = *engine.current_piece();

        engine.lock(&mut rng);
        assert!(!engine.try_move(0, 1));
        assert!(!engine.try_rotate());

        assert_eq!(engine.log().len(), 1);
        assert!(engine.take_events().is_empty());
        assert!(engine.board().same_tiles(&board));
        assert_eq!(engine.current_piece(), &piece);
        assert_eq!(engine.state(), EngineState::LiveGameOver);
    }

    #[test]
    fn test_paused_engine_ignores_direct_calls() {
        let (mut engine, mut rng) = new_engine(6);
        let piece = *engine.current_piece();
        assert!(engine.pause());
        engine.lock(&mut rng);
        assert!(!engine.try_move(1, 0));
        assert!(!engine.try_rotate());
        assert_eq!(engine.current_piece(), &piece);
        assert!(engine.log().is_empty());
        assert_eq!(engine.board().block_count(), 0);
    }

    #[test]
    fn test_overflowing_move_is_rejected() {
        let (mut engine, mut rng) = new_engine(4);
        let piece = *engine.current_piece();
        engine.apply(&Command::move_by(0, i32::MAX, 0), &mut rng);
        engine.apply(&Command::move_by(0, 0, i32::MIN), &mut rng);
        assert_eq!(engine.current_piece(), &piece);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_short_board_has_no_preview() {
        let config = EngineConfig {
            board_width: 10,
            board_height: 4,
            ..EngineConfig::default()
        };
        assert_eq!(config.preview_len(), 0);
        let mut rng = RandomSource::default();
        let mut engine = SimulationEngine::new_game(config, &mut rng, 3, "now");
        assert_eq!(engine.next_pieces().count(), 0);
        drop_and_lock(&mut engine, &mut rng);
        assert_eq!(engine.next_pieces().count(), 0);
        assert_eq!(engine.log().iter().last().map(|c| &c.kind), Some(&CommandKind::LockPiece));
    }

    #[test]
    fn test_filled_row_scores() {
        let (mut engine, mut rng) = new_engine(42);
        let landing = engine.ghost_piece();
        let bottom = i32::from(engine.board().height()) - 2;
        assert_eq!(landing.cells().iter().map(|c| c.1).max(), Some(bottom));
        let filler = if landing.kind() == TileType::O {
            TileType::T
        } else {
            TileType::O
        };
        // Fill the bottom interior row except where the piece will land.
        for x in 1..i32::from(engine.board().width()) - 1 {
            if !landing.cells().contains(&(x, bottom)) {
                engine.board_mut().set_tile(x, bottom, filler);
            }
        }

        drop_and_lock(&mut engine, &mut rng);
        assert_eq!(engine.score(), 100);
        assert!(engine.take_events().contains(&EngineEvent::PieceLocked {
            kind: landing.kind(),
            lines_cleared: 1,
            score_gained: 100
        }));
        for x in 1..i32::from(engine.board().width()) - 1 {
            assert!(!engine
                .board()
                .get_tile(x, bottom)
                .is_some_and(|t| t.tile_type() == filler));
        }
    }

    #[test]
    fn test_descent_timer_moves_piece() {
        let (mut engine, mut rng) = new_engine(1);
        let y = engine.current_piece().y;
        assert!(engine.tick(&mut rng, 700));
        assert_eq!(engine.current_piece().y, y);
        engine.tick(&mut rng, 50);
        assert_eq!(engine.current_piece().y, y + 1);
        assert_eq!(engine.frame_count(), 2);
    }

    #[test]
    fn test_soft_drop_accelerates_descent() {
        let (mut engine, mut rng) = new_engine(1);
        let y = engine.current_piece().y;
        engine.press(GameAction::SoftDrop);
        engine.tick(&mut rng, 50);
        assert_eq!(engine.current_piece().y, y + 1);
        engine.release(GameAction::SoftDrop);
        engine.tick(&mut rng, 50);
        assert_eq!(engine.current_piece().y, y + 1);
    }

    #[test]
    fn test_held_side_keys_cancel_each_other() {
        let (mut engine, mut rng) = new_engine(1);
        let x = engine.current_piece().x;
        engine.press(GameAction::MoveLeft);
        engine.press(GameAction::MoveRight);
        engine.tick(&mut rng, 50);
        assert_eq!(engine.current_piece().x, x + 1);
    }

    #[test]
    fn test_pause_blocks_ticks() {
        let (mut engine, mut rng) = new_engine(1);
        engine.press(GameAction::Pause);
        assert_eq!(engine.state(), EngineState::LivePaused);
        assert!(!engine.tick(&mut rng, 10_000));
        assert_eq!(engine.frame_count(), 0);
        engine.press(GameAction::MoveLeft);
        assert!(engine.resume());
        assert!(!engine.resume());
        engine.tick(&mut rng, 16);
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_autosave_failure_keeps_timer() {
        let config = EngineConfig {
            autosave_interval_ms: 100,
            ..EngineConfig::default()
        };
        let mut rng = RandomSource::default();
        let mut engine = SimulationEngine::new_game(config, &mut rng, 5, "now");
        let mut calls = 0;
        for _ in 0..3 {
            engine.tick_with(&mut rng, 100, |_| {
                calls += 1;
                Err("disk full")
            });
        }
        assert_eq!(calls, 3);
        assert_eq!(engine.state(), EngineState::LiveRunning);
    }

    #[test]
    fn test_autosave_snapshot_precedes_frame_tick() {
        let config = EngineConfig {
            autosave_interval_ms: 16,
            ..EngineConfig::default()
        };
        let mut rng = RandomSource::default();
        let mut engine = SimulationEngine::new_game(config, &mut rng, 5, "now");
        let mut saved_frame = None;
        engine.tick_with(&mut rng, 16, |snapshot| {
            saved_frame = Some(snapshot.clock.frame_count());
            Ok::<(), String>(())
        });
        assert_eq!(saved_frame, Some(0));
        assert_eq!(engine.frame_count(), 1);
    }

    #[test]
    fn test_replay_reproduces_live_game() {
        let (mut live, mut rng) = new_engine(99);
        for step in 0..200 {
            if step % 7 == 0 {
                live.press(GameAction::Rotate);
            } else if step % 7 == 3 {
                live.release(GameAction::Rotate);
            }
            if step % 11 == 0 {
                live.press(GameAction::MoveLeft);
            } else if step % 11 == 5 {
                live.release(GameAction::MoveLeft);
            }
            live.press(GameAction::SoftDrop);
            live.tick(&mut rng, 16);
        }
        let record = live.replay_record(0);

        let mut replay_rng = RandomSource::default();
        let mut replay =
            SimulationEngine::from_replay(EngineConfig::default(), &record, &mut replay_rng);
        assert_eq!(replay.state(), EngineState::ReplayRunning);
        while replay.tick(&mut replay_rng, 16) {}

        assert_eq!(replay.state(), EngineState::ReplayOver);
        assert!(replay.board().same_tiles(live.board()));
        assert_eq!(replay.score(), live.score());
        assert_eq!(replay.current_piece(), live.current_piece());
    }

    #[test]
    fn test_empty_replay_ends_on_first_tick() {
        let record = ReplayRecord {
            board_width: 30,
            board_height: 20,
            start_date: String::new(),
            finished_time: "00".into(),
            file_index: 0,
            score: 0,
            seed: 1,
            events: Vec::new(),
        };
        let mut rng = RandomSource::default();
        let mut engine = SimulationEngine::from_replay(EngineConfig::default(), &record, &mut rng);
        assert!(engine.tick(&mut rng, 16));
        assert_eq!(engine.state(), EngineState::ReplayOver);
        assert_eq!(
            engine.take_events(),
            vec![EngineEvent::ReplayFinished { score: 0 }]
        );
        assert!(engine.board().same_tiles(&Board::new(30, 20)));
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let (mut engine, mut rng) = new_engine(8);
        let before = *engine.current_piece();
        engine.apply(&Command::new(0, CommandKind::Unknown("hold".into())), &mut rng);
        assert_eq!(engine.current_piece(), &before);
        assert!(engine.log().is_empty());
    }

    #[test]
    fn test_snapshot_resume_matches_uninterrupted_game() {
        let (mut game, mut rng) = new_engine(2024);
        for dx in [-12, -8, -4] {
            drop_at(&mut game, &mut rng, dx);
        }
        let snapshot = game.snapshot(&rng);

        let mut other_rng = RandomSource::new(0);
        let mut resumed =
            SimulationEngine::from_snapshot(EngineConfig::default(), snapshot, &mut other_rng)
                .unwrap();
        for dx in [0, 4, 8] {
            drop_at(&mut game, &mut rng, dx);
            drop_at(&mut resumed, &mut other_rng, dx);
        }
        assert_eq!(game.state(), EngineState::LiveRunning);
        assert!(resumed.board().same_tiles(game.board()));
        assert!(resumed.next_pieces().eq(game.next_pieces()));
        assert_eq!(resumed.log(), game.log());
    }

    #[test]
    fn test_bad_snapshot_state_leaves_rng() {
        let (game, rng) = new_engine(11);
        let mut snapshot = game.snapshot(&rng);
        snapshot.random_state = "garbage".into();

        let mut caller_rng = RandomSource::new(77);
        let before = caller_rng.export_state();
        let result =
            SimulationEngine::from_snapshot(EngineConfig::default(), snapshot, &mut caller_rng);
        assert!(result.is_err());
        assert_eq!(caller_rng.export_state(), before);
    }

    #[test]
    fn test_restart_resets_everything() {
        let (mut engine, mut rng) = new_engine(42);
        drop_and_lock(&mut engine, &mut rng);
        engine.tick(&mut rng, 16);
        engine.restart(&mut rng, 42, "later");
        let (fresh, _) = new_engine(42);
        assert_eq!(engine.current_piece(), fresh.current_piece());
        assert_eq!(engine.frame_count(), 0);
        assert!(engine.log().is_empty());
        assert_eq!(engine.board().block_count(), 0);
        assert_eq!(engine.start_date(), "later");
    }
}
