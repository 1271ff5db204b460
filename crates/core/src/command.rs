//! Command module - recorded player actions and the ordered event log
//!
//! Every successful move, rotation and lock during live play is appended to the
//! [`EventLog`] together with the frame it happened on. Replaying the log in
//! insertion order against the same seed reproduces the game exactly.

use std::collections::VecDeque;

/// What a command does when applied
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move { dx: i32, dy: i32 },
    Rotate,
    LockPiece,
    /// A command type this build does not know; applying it does nothing
    Unknown(String),
}

impl CommandKind {
    /// Persisted type tag
    pub fn type_name(&self) -> &str {
        match self {
            CommandKind::Move { .. } => "move",
            CommandKind::Rotate => "rotate",
            CommandKind::LockPiece => "lock_piece",
            CommandKind::Unknown(name) => name,
        }
    }
}

/// A timestamped command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub frame: u64,
    pub kind: CommandKind,
}

impl Command {
    pub fn new(frame: u64, kind: CommandKind) -> Self {
        Self { frame, kind }
    }

    pub fn move_by(frame: u64, dx: i32, dy: i32) -> Self {
        Self::new(frame, CommandKind::Move { dx, dy })
    }

    pub fn rotate(frame: u64) -> Self {
        Self::new(frame, CommandKind::Rotate)
    }

    pub fn lock_piece(frame: u64) -> Self {
        Self::new(frame, CommandKind::LockPiece)
    }
}

/// FIFO log of commands.
///
/// Order is insertion order; commands are never re-sorted by frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    commands: VecDeque<Command>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Pop the front command if it was issued at or before `frame`
    pub fn pop_due(&mut self, frame: u64) -> Option<Command> {
        if self.commands.front()?.frame <= frame {
            self.commands.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn to_vec(&self) -> Vec<Command> {
        self.commands.iter().cloned().collect()
    }
}

impl FromIterator<Command> for EventLog {
    fn from_iter<T: IntoIterator<Item = Command>>(iter: T) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<Command>> for EventLog {
    fn from(commands: Vec<Command>) -> Self {
        Self {
            commands: commands.into(),
        }
    }
}
