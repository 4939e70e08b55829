//! Command parsing
//!
//! A line of player input becomes an [`Operation`] plus the raw argument
//! text following the command word. Words come from the static
//! [`vocabulary`] table; edit-only words are rejected outside edit mode.

mod vocabulary;

pub use vocabulary::{CommandFlags, VocabEntry, lookup, visible_entries, vocabulary};

use strum::{Display, IntoStaticStr};

use crate::action::{ActionResult, Direction};

/// Everything a command can ask the world to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Move(Direction),
    MakeExit(Direction),
    DeleteExit(Direction),
    ToggleExit(Direction),
    Take,
    Drop,
    Use,
    Inventory,
    CreateItem,
    DeleteItem,
    MaxQuantity,
    MaxSize,
    MaxWeight,
    EditDescription,
    SetRequired,
    SetTarget,
    ClearRequired,
    ClearTarget,
    Toggle,
    Clean,
    DeleteRoom,
    Edit,
    ListItems,
    ListRooms,
    Save,
    SetEnd,
    SetIntro,
    SetStart,
    TimeLimit,
    Help,
    Exit,
    #[default]
    Invalid,
}

/// A parsed command: what to do and the text after the command word
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    pub operation: Operation,
    pub argument: String,
    pub description: &'static str,
    pub edit_only: bool,
}

impl Command {
    /// Build a command directly, bypassing the parser
    pub fn new(operation: Operation, argument: impl Into<String>) -> Self {
        let entry = vocabulary().iter().find(|e| e.operation == operation);
        Self {
            operation,
            argument: argument.into(),
            description: entry.map(|e| e.description).unwrap_or(""),
            edit_only: entry.is_some_and(VocabEntry::is_edit_only),
        }
    }

    /// Parse a fresh command from a line of input
    pub fn parse(input: &str, edit_mode: bool) -> (Self, ActionResult) {
        let mut cmd = Self::default();
        let res = cmd.read(input, edit_mode);
        (cmd, res)
    }

    /// Replace this command with the one read from `input`.
    ///
    /// The line is lower-cased as a whole, so arguments are lower-case too.
    /// The argument is everything after the command word and one separator.
    pub fn read(&mut self, input: &str, edit_mode: bool) -> ActionResult {
        *self = Self::default();

        if input.is_empty() {
            return ActionResult::failure("You did not enter any command.");
        }

        let lower = input.to_lowercase();
        let line = lower.split('\n').next().unwrap_or_default().trim_start();
        let word_end = line.find(char::is_whitespace).unwrap_or(line.len());
        let (word, rest) = line.split_at(word_end);

        match lookup(word) {
            Some(entry) if entry.accepted(edit_mode) => {
                let mut chars = rest.chars();
                chars.next();
                self.operation = entry.operation;
                self.description = entry.description;
                self.edit_only = entry.is_edit_only();
                self.argument = chars.as_str().to_string();
                ActionResult::success("")
            }
            _ => ActionResult::failure("I don't know how to do that."),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.operation != Operation::Invalid
    }
}

/// Command listing shown by `help`
pub fn help_text(edit_mode: bool) -> String {
    visible_entries(edit_mode)
        .iter()
        .map(|entry| format!("  {:<13}{}", entry.word, entry.description))
        .collect::<Vec<_>>()
        .join("\n")
}
