//! Outcomes and directions shared by every engine operation

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Compass directions a room can have an exit in
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in save-file order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Get the opposite direction
    pub const fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Slot index used for per-direction arrays
    pub const fn index(&self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Capitalized name for user-facing messages
    pub const fn title(&self) -> &'static str {
        match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        }
    }
}

/// Kind of outcome an operation produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum ResultKind {
    /// Nothing changed; the message explains why
    #[default]
    Failure,
    /// The operation went through
    Success,
    /// The user cancelled text entry; nothing changed and nothing went wrong
    Abort,
    /// The dispatch loop should end
    Exit,
}

/// Result of executing a command: an outcome plus a message for the player
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionResult {
    pub kind: ResultKind,
    pub message: String,
}

impl ActionResult {
    pub fn new(kind: ResultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Success, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Failure, message)
    }

    pub fn abort(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Abort, message)
    }

    pub fn exit(message: impl Into<String>) -> Self {
        Self::new(ResultKind::Exit, message)
    }

    pub fn is_success(&self) -> bool {
        self.kind == ResultKind::Success
    }

    pub fn is_failure(&self) -> bool {
        self.kind == ResultKind::Failure
    }

    /// Replace the message, keeping the outcome
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}
