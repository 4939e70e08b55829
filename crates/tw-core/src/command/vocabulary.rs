//! The command vocabulary: every word the parser understands

use super::Operation;
use crate::action::Direction;

bitflags::bitflags! {
    /// Flags for vocabulary entries
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommandFlags: u32 {
        /// Only accepted (and only listed) while edit mode is on
        const EDIT_ONLY = 1 << 0;
        /// Accepted in every mode even when flagged edit-only
        const ALWAYS_ACCEPTED = 1 << 1;
    }
}

/// One word of the vocabulary
#[derive(Debug, Clone)]
pub struct VocabEntry {
    /// Lower-case word typed by the player
    pub word: &'static str,
    /// Line shown by `help`
    pub description: &'static str,
    pub operation: Operation,
    pub flags: CommandFlags,
}

impl VocabEntry {
    pub fn is_edit_only(&self) -> bool {
        self.flags.contains(CommandFlags::EDIT_ONLY)
    }

    /// Whether the word is accepted in the given mode
    pub fn accepted(&self, edit_mode: bool) -> bool {
        self.flags.contains(CommandFlags::ALWAYS_ACCEPTED) || !self.is_edit_only() || edit_mode
    }
}

const EDIT: CommandFlags = CommandFlags::EDIT_ONLY;
const PLAY: CommandFlags = CommandFlags::empty();

macro_rules! vocab {
    ($word:expr, $op:expr, $desc:expr, $flags:expr) => {
        VocabEntry {
            word: $word,
            description: $desc,
            operation: $op,
            flags: $flags,
        }
    };
}

const VOCABULARY: &[VocabEntry] = &[
    // Movement
    vocab!("north", Operation::Move(Direction::North), "Move to the north.", PLAY),
    vocab!("n", Operation::Move(Direction::North), "Move to the north.", PLAY),
    vocab!("east", Operation::Move(Direction::East), "Move to the east.", PLAY),
    vocab!("e", Operation::Move(Direction::East), "Move to the east.", PLAY),
    vocab!("south", Operation::Move(Direction::South), "Move to the south.", PLAY),
    vocab!("s", Operation::Move(Direction::South), "Move to the south.", PLAY),
    vocab!("west", Operation::Move(Direction::West), "Move to the west.", PLAY),
    vocab!("w", Operation::Move(Direction::West), "Move to the west.", PLAY),
    // Items and inventory
    vocab!("take", Operation::Take, "Pick up an item.", PLAY),
    vocab!("drop", Operation::Drop, "Drop an item.", PLAY),
    vocab!("use", Operation::Use, "Use an item here.", PLAY),
    vocab!("inventory", Operation::Inventory, "View inventory.", PLAY),
    vocab!("inv", Operation::Inventory, "View inventory.", PLAY),
    vocab!("create", Operation::CreateItem, "Create a new item.", EDIT),
    vocab!("delitem", Operation::DeleteItem, "Delete specified item ID", EDIT),
    vocab!("maxquantity", Operation::MaxQuantity, "Set number of items that fit in bag.", EDIT),
    vocab!("maxsize", Operation::MaxSize, "Set largest item that fits in bag.", EDIT),
    vocab!("maxweight", Operation::MaxWeight, "Set heaviest item that fits in bag.", EDIT),
    // Room editing
    vocab!("dn", Operation::DeleteExit(Direction::North), "Delete exit to north.", EDIT),
    vocab!("de", Operation::DeleteExit(Direction::East), "Delete exit to east.", EDIT),
    vocab!("ds", Operation::DeleteExit(Direction::South), "Delete exit to south.", EDIT),
    vocab!("dw", Operation::DeleteExit(Direction::West), "Delete exit to west.", EDIT),
    vocab!("mn", Operation::MakeExit(Direction::North), "Make exit to north. Optional arg of room ID, 'cond' or 'switch'.", EDIT),
    vocab!("me", Operation::MakeExit(Direction::East), "Make exit to east. Optional arg of room ID, 'cond' or 'switch'.", EDIT),
    vocab!("ms", Operation::MakeExit(Direction::South), "Make exit to south. Optional arg of room ID, 'cond' or 'switch'.", EDIT),
    vocab!("mw", Operation::MakeExit(Direction::West), "Make exit to west. Optional arg of room ID, 'cond' or 'switch'.", EDIT),
    vocab!("tn", Operation::ToggleExit(Direction::North), "Enable toggle to north.", EDIT),
    vocab!("te", Operation::ToggleExit(Direction::East), "Enable toggle to east.", EDIT),
    vocab!("ts", Operation::ToggleExit(Direction::South), "Enable toggle to south.", EDIT),
    vocab!("tw", Operation::ToggleExit(Direction::West), "Enable toggle to west.", EDIT),
    vocab!("desc", Operation::EditDescription, "Edit the room description.", EDIT),
    vocab!("description", Operation::EditDescription, "Edit the room description.", EDIT),
    vocab!("setrequired", Operation::SetRequired, "Set item required to toggle room.", EDIT),
    vocab!("settarget", Operation::SetTarget, "Set room to toggle when item is used.", EDIT),
    vocab!("clearreq", Operation::ClearRequired, "Clear item required to toggle room.", EDIT),
    vocab!("cleartar", Operation::ClearTarget, "Clear room to toggle when item is used.", EDIT),
    vocab!("toggle", Operation::Toggle, "Toggle state of current room.", EDIT),
    // World management
    vocab!("clean", Operation::Clean, "Clean up unused rooms and items.", EDIT),
    vocab!("delroom", Operation::DeleteRoom, "Delete specified room ID.", EDIT),
    vocab!("edit", Operation::Edit, "Toggle edit mode.", CommandFlags::EDIT_ONLY.union(CommandFlags::ALWAYS_ACCEPTED)),
    vocab!("listitems", Operation::ListItems, "List all items in world.", EDIT),
    vocab!("listrooms", Operation::ListRooms, "List all rooms in world.", EDIT),
    vocab!("save", Operation::Save, "Save the current world.", EDIT),
    vocab!("setend", Operation::SetEnd, "Set current room to end point.", EDIT),
    vocab!("setintro", Operation::SetIntro, "Set introduction displayed at start.", EDIT),
    vocab!("setstart", Operation::SetStart, "Set current room to start point.", EDIT),
    vocab!("timelimit", Operation::TimeLimit, "Set time limit to find end point.", EDIT),
    // Meta
    vocab!("h", Operation::Help, "Display all available commands.", PLAY),
    vocab!("help", Operation::Help, "Display all available commands.", PLAY),
    vocab!("exit", Operation::Exit, "Exit the game.", PLAY),
    vocab!("quit", Operation::Exit, "Exit the game.", PLAY),
];

/// Every vocabulary entry, in declaration order
pub fn vocabulary() -> &'static [VocabEntry] {
    VOCABULARY
}

/// Look up a word (exact, lower-case match)
pub fn lookup(word: &str) -> Option<&'static VocabEntry> {
    VOCABULARY.iter().find(|entry| entry.word == word)
}

/// Entries listed by `help` in the given mode, sorted by word
pub fn visible_entries(edit_mode: bool) -> Vec<&'static VocabEntry> {
    let mut entries: Vec<_> = VOCABULARY
        .iter()
        .filter(|entry| !entry.is_edit_only() || edit_mode)
        .collect();
    entries.sort_by_key(|entry| entry.word);
    entries
}
