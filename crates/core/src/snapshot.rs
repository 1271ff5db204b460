use crate::clock::FrameClock;
use crate::command::Command;
use crate::piece::Piece;
use crate::Board;

/// Everything needed to resume a live game exactly where it stopped.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub board: Board,
    /// Exported [`crate::RandomSource`] state at capture time
    pub random_state: String,
    pub seed: u64,
    pub score: u64,
    pub current_piece: Piece,
    pub next_pieces: Vec<Piece>,
    pub clock: FrameClock,
    /// Full command history since the game started
    pub events: Vec<Command>,
    pub start_date: String,
}

/// A finished game, reduced to what replay needs: board size, seed and the
/// command history. Captured once at game over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayRecord {
    pub board_width: u16,
    pub board_height: u16,
    pub start_date: String,
    /// Play time at game over, as [`FrameClock::time_parts`]
    pub finished_time: String,
    /// Position in the bounded replay store
    pub file_index: usize,
    pub score: u64,
    pub seed: u64,
    pub events: Vec<Command>,
}

impl ReplayRecord {
    pub fn event_count(&self) -> usize {
        self.events.len()
    }
}
