//! Rooms: the nodes of the world graph
//!
//! Every room shares the same shell (id, description, contents, four exit
//! slots). What differs between variants lives in [`RoomKind`]:
//! - `Basic`: one state, every exit always open
//! - `Condition`: exits flagged as toggle-controlled close while disabled
//! - `Switch`: using its item flips it and the state of a target room
//!
//! Operations a variant does not support still exist on every room and fail
//! with a message naming the limitation, so the player learns what kind of
//! room they are standing in.

mod condition;
mod switch;
mod table;

pub use condition::ConditionState;
pub use switch::SwitchState;
pub use table::RoomTable;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::action::{ActionResult, Direction};
use crate::item::{ItemId, ItemRegistry};

pub(crate) const CANNOT_USE_HERE: &str = "You cannot use that here.";
const NO_ITEMS_HERE: &str = "You cannot use items in this room type.";
const NO_REQUIRED_HERE: &str = "Items can only be used in switch and condition rooms.";
const NO_TARGET_HERE: &str = "You cannot set a target room in this room type.";
const NO_TARGET_TO_CLEAR: &str = "Only switch rooms have a target.";
const ONE_STATE_ONLY: &str = "This room type only has one state.";
const CONDITION_ONLY: &str = "This command only works on a condition room.";

/// Unique identifier for rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    /// Placeholder written to save files for "no room"
    pub const NONE: RoomId = RoomId(0);

    /// The following id, or `None` at the top of the id space
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(RoomId)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RoomId> for u32 {
    fn from(id: RoomId) -> u32 {
        id.0
    }
}

/// Room variant tag, as written in save files and room listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RoomType {
    Basic,
    Condition,
    Switch,
}

/// Variant-specific room state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomKind {
    Basic,
    Condition(ConditionState),
    Switch(SwitchState),
}

impl RoomKind {
    /// Fresh state for a newly created room of the given type
    pub fn new(room_type: RoomType) -> Self {
        match room_type {
            RoomType::Basic => RoomKind::Basic,
            RoomType::Condition => RoomKind::Condition(ConditionState::default()),
            RoomType::Switch => RoomKind::Switch(SwitchState::default()),
        }
    }

    pub fn room_type(&self) -> RoomType {
        match self {
            RoomKind::Basic => RoomType::Basic,
            RoomKind::Condition(_) => RoomType::Condition,
            RoomKind::Switch(_) => RoomType::Switch,
        }
    }
}

/// A location in the world
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    id: RoomId,
    description: String,
    items: BTreeSet<ItemId>,
    exits: [Option<RoomId>; 4],
    kind: RoomKind,
}

impl Room {
    /// Create a room with the default description for its type
    pub fn new(id: RoomId, room_type: RoomType) -> Self {
        let description = match room_type {
            RoomType::Basic => "A new basic room with no interactivity.\n",
            RoomType::Condition => "A new conditional room that can disable certain exits.\n",
            RoomType::Switch => "A room that switches the state of a different room.\n",
        };
        Self {
            id,
            description: description.to_string(),
            items: BTreeSet::new(),
            exits: [None; 4],
            kind: RoomKind::new(room_type),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn room_type(&self) -> RoomType {
        self.kind.room_type()
    }

    pub fn kind(&self) -> &RoomKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut RoomKind {
        &mut self.kind
    }

    /// Description shown while enabled (the only one for basic rooms)
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Description shown while disabled, for two-state rooms
    pub fn alt_description(&self) -> Option<&str> {
        match &self.kind {
            RoomKind::Basic => None,
            RoomKind::Condition(state) => Some(&state.alt_description),
            RoomKind::Switch(state) => Some(&state.alt_description),
        }
    }

    /// On/off state of two-state rooms
    pub fn is_enabled(&self) -> Option<bool> {
        match &self.kind {
            RoomKind::Basic => None,
            RoomKind::Condition(state) => Some(state.enabled),
            RoomKind::Switch(state) => Some(state.enabled),
        }
    }

    /// Whether the alternate description is the one currently shown
    pub fn shows_alternate(&self) -> bool {
        self.is_enabled() == Some(false)
    }

    /// The description currently shown to the player
    pub fn active_description(&self) -> &str {
        match self.alt_description() {
            Some(alt) if self.shows_alternate() => alt,
            _ => &self.description,
        }
    }

    /// The exit slot as stored, ignoring any blocking state
    pub fn stored_exit(&self, dir: Direction) -> Option<RoomId> {
        self.exits[dir.index()]
    }

    /// The exit the player can actually take in `dir`
    pub fn exit(&self, dir: Direction) -> Option<RoomId> {
        match &self.kind {
            RoomKind::Condition(state) if state.blocks(dir) => None,
            _ => self.stored_exit(dir),
        }
    }

    pub(crate) fn set_exit_slot(&mut self, dir: Direction, target: Option<RoomId>) {
        self.exits[dir.index()] = target;
    }

    /// Exit slots in north/east/south/west order
    pub fn exits(&self) -> [Option<RoomId>; 4] {
        self.exits
    }

    pub fn items(&self) -> &BTreeSet<ItemId> {
        &self.items
    }

    pub fn has_item(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    pub fn add_item(&mut self, id: ItemId) -> ActionResult {
        if !self.items.insert(id) {
            return ActionResult::failure("That item is already in the room.");
        }
        ActionResult::success("")
    }

    pub fn remove_item(&mut self, id: ItemId) -> ActionResult {
        if self.items.remove(&id) {
            ActionResult::success("")
        } else {
            ActionResult::failure("Item not found.")
        }
    }

    /// Item the room reacts to, for two-state rooms
    pub fn required(&self) -> Option<ItemId> {
        match &self.kind {
            RoomKind::Basic => None,
            RoomKind::Condition(state) => state.required,
            RoomKind::Switch(state) => state.required,
        }
    }

    /// Room a switch cascades to
    pub fn target(&self) -> Option<RoomId> {
        match &self.kind {
            RoomKind::Switch(state) => state.target,
            _ => None,
        }
    }

    /// Replace the description of the current state
    pub fn set_description(&mut self, text: impl Into<String>) -> ActionResult {
        let text = text.into();
        let alternate = self.shows_alternate();
        match &mut self.kind {
            RoomKind::Condition(state) if alternate => state.alt_description = text,
            RoomKind::Switch(state) if alternate => state.alt_description = text,
            _ => self.description = text,
        }
        ActionResult::success("Description updated.")
    }

    pub(crate) fn set_alt_description(&mut self, text: String) {
        match &mut self.kind {
            RoomKind::Condition(state) => state.alt_description = text,
            RoomKind::Switch(state) => state.alt_description = text,
            RoomKind::Basic => {}
        }
    }

    pub(crate) fn set_base_description(&mut self, text: String) {
        self.description = text;
    }

    /// Set the item that toggles this room; `name` is only used for the message
    pub fn set_required(&mut self, item: ItemId, name: &str) -> ActionResult {
        let slot = match &mut self.kind {
            RoomKind::Basic => return ActionResult::failure(NO_ITEMS_HERE),
            RoomKind::Condition(state) => &mut state.required,
            RoomKind::Switch(state) => &mut state.required,
        };
        *slot = Some(item);
        ActionResult::success(format!("Required item set to {} ({}).", name, item))
    }

    pub fn clear_required(&mut self) -> ActionResult {
        let slot = match &mut self.kind {
            RoomKind::Basic => return ActionResult::failure(NO_REQUIRED_HERE),
            RoomKind::Condition(state) => &mut state.required,
            RoomKind::Switch(state) => &mut state.required,
        };
        *slot = None;
        ActionResult::success("Cleared the item required to operate this room.")
    }

    pub fn set_target(&mut self, target: RoomId) -> ActionResult {
        match &mut self.kind {
            RoomKind::Switch(state) => {
                state.target = Some(target);
                ActionResult::success("Target room updated.")
            }
            _ => ActionResult::failure(NO_TARGET_HERE),
        }
    }

    pub fn clear_target(&mut self) -> ActionResult {
        match &mut self.kind {
            RoomKind::Switch(state) => {
                state.target = None;
                ActionResult::success("Cleared target room.")
            }
            _ => ActionResult::failure(NO_TARGET_TO_CLEAR),
        }
    }

    /// Flip this room's own state. Switch cascades are handled by
    /// [`RoomTable::toggle`], which can reach the target room.
    pub fn toggle_local(&mut self) -> ActionResult {
        match &mut self.kind {
            RoomKind::Basic => ActionResult::failure(ONE_STATE_ONLY),
            RoomKind::Condition(state) => ActionResult::success(state.toggle()),
            RoomKind::Switch(state) => ActionResult::success(state.toggle()),
        }
    }

    /// Flip whether the exit in `dir` closes while the room is disabled
    pub fn toggle_exit(&mut self, dir: Direction) -> ActionResult {
        match &mut self.kind {
            RoomKind::Condition(state) => ActionResult::success(state.toggle_exit(dir)),
            _ => ActionResult::failure(CONDITION_ONLY),
        }
    }

    /// Drop every reference this room holds to `item` (contents and required slot)
    pub(crate) fn forget_item(&mut self, item: ItemId) {
        self.items.remove(&item);
        let slot = match &mut self.kind {
            RoomKind::Basic => return,
            RoomKind::Condition(state) => &mut state.required,
            RoomKind::Switch(state) => &mut state.required,
        };
        if *slot == Some(item) {
            *slot = None;
        }
    }

    /// Render the room for the player; edit mode adds the builder's view
    pub fn view(&self, edit_mode: bool, items: &ItemRegistry) -> String {
        let mut out = String::new();

        if edit_mode {
            out.push_str(&format!("Room ID: {}\nExits: ", self.id));
            for dir in Direction::ALL {
                if self.stored_exit(dir).is_some() {
                    out.push_str(dir.title());
                    out.push(' ');
                }
            }
            out.push('\n');
            match &self.kind {
                RoomKind::Basic => {}
                RoomKind::Condition(state) => out.push_str(&state.edit_summary()),
                RoomKind::Switch(state) => out.push_str(&state.edit_summary()),
            }
            out.push('\n');
        }

        out.push_str(self.active_description());
        for id in &self.items {
            if let Some(item) = items.get(*id) {
                if !item.description().is_empty() {
                    out.push_str(item.description());
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Render an optional id the way edit-mode summaries show it
pub(crate) fn id_or_none<T: std::fmt::Display>(id: Option<T>) -> String {
    id.map(|id| id.to_string())
        .unwrap_or_else(|| "None".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_basic_room() {
        let room = Room::new(RoomId(1), RoomType::Basic);
        assert_eq!(room.description(), "A new basic room with no interactivity.\n");
        assert!(room.items().is_empty());
        for dir in Direction::ALL {
            assert_eq!(room.stored_exit(dir), None);
        }
        assert_eq!(room.is_enabled(), None);
    }

    #[test]
    fn test_room_type_tags() {
        assert_eq!(RoomType::Condition.to_string(), "condition");
        assert_eq!(RoomType::from_str("switch").unwrap(), RoomType::Switch);
        assert!(RoomType::from_str("castle").is_err());
    }

    #[test]
    fn test_add_and_remove_item() {
        let mut room = Room::new(RoomId(1), RoomType::Basic);
        assert!(room.add_item(ItemId(3)).is_success());
        assert!(room.add_item(ItemId(3)).is_failure());
        assert_eq!(room.items().len(), 1);

        assert!(room.remove_item(ItemId(3)).is_success());
        let res = room.remove_item(ItemId(3));
        assert!(res.is_failure());
        assert_eq!(res.message, "Item not found.");
    }

    #[test]
    fn test_basic_capabilities_fail_with_messages() {
        let mut room = Room::new(RoomId(1), RoomType::Basic);
        assert_eq!(room.toggle_local().message, ONE_STATE_ONLY);
        assert_eq!(room.set_required(ItemId(1), "key").message, NO_ITEMS_HERE);
        assert_eq!(room.clear_required().message, NO_REQUIRED_HERE);
        assert_eq!(room.set_target(RoomId(2)).message, NO_TARGET_HERE);
        assert_eq!(room.clear_target().message, NO_TARGET_TO_CLEAR);
        assert_eq!(room.toggle_exit(Direction::North).message, CONDITION_ONLY);
        assert!(room.toggle_local().is_failure());
    }

    #[test]
    fn test_set_description_targets_active_state() {
        let mut room = Room::new(RoomId(1), RoomType::Condition);
        room.set_description("Lit hall.\n");
        assert_eq!(room.description(), "Lit hall.\n");

        room.toggle_local();
        room.set_description("Dark hall.\n");
        assert_eq!(room.alt_description(), Some("Dark hall.\n"));
        assert_eq!(room.description(), "Lit hall.\n");
        assert_eq!(room.active_description(), "Dark hall.\n");
    }

    #[test]
    fn test_switch_starts_off() {
        let room = Room::new(RoomId(1), RoomType::Switch);
        assert_eq!(room.is_enabled(), Some(false));
        assert!(room.shows_alternate());
        assert_eq!(room.active_description(), "The description when the switch is flipped.\n");
    }

    #[test]
    fn test_required_and_target_slots() {
        let mut room = Room::new(RoomId(1), RoomType::Switch);
        let res = room.set_required(ItemId(7), "lever");
        assert_eq!(res.message, "Required item set to lever (7).");
        assert_eq!(room.required(), Some(ItemId(7)));
        assert!(room.set_target(RoomId(4)).is_success());
        assert_eq!(room.target(), Some(RoomId(4)));

        room.forget_item(ItemId(7));
        assert_eq!(room.required(), None);
        assert!(room.clear_target().is_success());
        assert_eq!(room.target(), None);
    }

    #[test]
    fn test_view_lists_visible_items() {
        let mut items = ItemRegistry::new();
        let lamp = items.create("lamp", Vec::<String>::new(), "A lamp glows here.", 1, 1);
        let ghost = items.create("dust", Vec::<String>::new(), "", 0, 0);
        let mut room = Room::new(RoomId(1), RoomType::Basic);
        room.add_item(lamp);
        room.add_item(ghost);

        let text = room.view(false, &items);
        assert!(text.starts_with("A new basic room"));
        assert!(text.ends_with("A lamp glows here.\n"));

        let text = room.view(true, &items);
        assert!(text.starts_with("Room ID: 1\nExits: \n"));
    }
}
