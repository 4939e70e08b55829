//! The room table: owner of every room and keeper of the exit invariant
//!
//! Linking two rooms touches both of them, so exit edits, item use and
//! switch cascades live here rather than on [`Room`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::action::{ActionResult, Direction};
use crate::item::ItemId;

use super::{CANNOT_USE_HERE, Room, RoomId, RoomKind, RoomType};

const ROOM_NOT_FOUND: &str = "Room not found.";

/// Owner of every room in a world, with a monotonic id allocator
#[derive(Debug, Clone)]
pub struct RoomTable {
    rooms: BTreeMap<RoomId, Room>,
    next_id: RoomId,
}

impl Default for RoomTable {
    fn default() -> Self {
        Self {
            rooms: BTreeMap::new(),
            next_id: RoomId(1),
        }
    }
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a room of the given type
    pub fn create(&mut self, room_type: RoomType) -> RoomId {
        let id = self.allocate();
        self.rooms.insert(id, Room::new(id, room_type));
        debug!(room = id.0, %room_type, "created room");
        id
    }

    /// Next fresh id; past the top of the id space the lowest free one
    fn allocate(&mut self) -> RoomId {
        let id = self.next_id;
        match id.next() {
            Some(after) => {
                self.next_id = after;
                id
            }
            None => (1..=u32::MAX)
                .map(RoomId)
                .find(|id| !self.rooms.contains_key(id))
                .unwrap_or(id),
        }
    }

    /// Register a room read from save data, advancing the allocator past its
    /// id. Rooms whose id leaves the allocator nowhere to go are refused.
    pub fn insert_loaded(&mut self, room: Room) -> bool {
        let id = room.id();
        let Some(after) = id.next() else {
            return false;
        };
        if after > self.next_id {
            self.next_id = after;
        }
        self.rooms.insert(id, room);
        true
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Rooms in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.rooms.keys().copied()
    }

    pub fn first_id(&self) -> Option<RoomId> {
        self.rooms.keys().next().copied()
    }

    /// Id the next created room will receive
    pub fn next_id(&self) -> RoomId {
        self.next_id
    }

    /// The room reachable from `from` going `dir`, honoring blocked exits
    pub fn exit(&self, from: RoomId, dir: Direction) -> Option<RoomId> {
        self.get(from).and_then(|room| room.exit(dir))
    }

    /// Link `from` to `to` in `dir` and `to` back to `from` in the opposite
    /// direction. Both slots must be free.
    pub fn set_exit(&mut self, from: RoomId, dir: Direction, to: RoomId) -> ActionResult {
        let Some(source) = self.get(from) else {
            return ActionResult::failure(ROOM_NOT_FOUND);
        };
        let Some(target) = self.get(to) else {
            return ActionResult::failure("Pointer not an instance of an object.");
        };
        if source.stored_exit(dir).is_some() {
            return ActionResult::failure("An exit already exists in that direction.");
        }
        if target.stored_exit(dir.opposite()).is_some() {
            return ActionResult::failure(
                "Target room already has a room in the return direction.",
            );
        }

        if let Some(target) = self.get_mut(to) {
            target.set_exit_slot(dir.opposite(), Some(from));
        }
        if let Some(source) = self.get_mut(from) {
            source.set_exit_slot(dir, Some(to));
        }
        debug!(from = from.0, to = to.0, %dir, "linked rooms");
        ActionResult::success("")
    }

    /// Remove the exit in `dir` along with its return exit
    pub fn clear_exit(&mut self, from: RoomId, dir: Direction) -> ActionResult {
        let Some(source) = self.get_mut(from) else {
            return ActionResult::failure(ROOM_NOT_FOUND);
        };
        let Some(to) = source.stored_exit(dir) else {
            return ActionResult::failure("Exit not found.");
        };
        source.set_exit_slot(dir, None);

        if let Some(target) = self.get_mut(to) {
            if target.stored_exit(dir.opposite()) == Some(from) {
                target.set_exit_slot(dir.opposite(), None);
            }
        }
        debug!(from = from.0, to = to.0, %dir, "unlinked rooms");
        ActionResult::success(format!("{} exit removed.", dir.title()))
    }

    /// Flip a room's state. A switch also flips its target, one level deep:
    /// the target's own cascade does not run.
    pub fn toggle(&mut self, id: RoomId) -> ActionResult {
        let Some(room) = self.get_mut(id) else {
            return ActionResult::failure(ROOM_NOT_FOUND);
        };
        let result = room.toggle_local();
        let target = room.target();

        if result.is_success() {
            if let Some(target) = target.and_then(|t| self.get_mut(t)) {
                let cascade = target.toggle_local();
                debug!(from = id.0, target = target.id().0, cascaded = cascade.is_success(), "switch cascade");
            }
        }
        result
    }

    /// Use an item the player is holding inside room `id`
    pub fn use_item(&mut self, id: RoomId, item: ItemId) -> ActionResult {
        let Some(room) = self.get(id) else {
            return ActionResult::failure(ROOM_NOT_FOUND);
        };
        let message = match room.kind() {
            RoomKind::Condition(state) if state.required == Some(item) => {
                "You hear a rumbling noise."
            }
            RoomKind::Switch(state) if state.required == Some(item) => {
                "You hear a distant rumbling noise."
            }
            _ => return ActionResult::failure(CANNOT_USE_HERE),
        };
        self.toggle(id);
        ActionResult::success(message)
    }

    /// Use an item by id; the room must be holding it itself
    pub fn use_item_by_id(&mut self, id: RoomId, item: ItemId) -> ActionResult {
        let Some(room) = self.get(id) else {
            return ActionResult::failure(ROOM_NOT_FOUND);
        };
        match room.kind() {
            RoomKind::Basic => ActionResult::failure(CANNOT_USE_HERE),
            _ if !room.has_item(item) => {
                ActionResult::failure("You cannot find that item anywhere.")
            }
            _ => self.use_item(id, item),
        }
    }

    /// Remove every reference any room holds to `item`
    pub(crate) fn forget_item(&mut self, item: ItemId) {
        for room in self.rooms.values_mut() {
            room.forget_item(item);
        }
    }

    /// Remove a room after clearing every exit and switch target naming it
    pub(crate) fn detach(&mut self, id: RoomId) -> Option<Room> {
        if !self.contains(id) {
            return None;
        }
        for room in self.rooms.values_mut() {
            if room.id() == id {
                continue;
            }
            for dir in Direction::ALL {
                if room.stored_exit(dir) == Some(id) {
                    room.set_exit_slot(dir, None);
                }
            }
            if let RoomKind::Switch(state) = room.kind_mut() {
                if state.target == Some(id) {
                    state.target = None;
                }
            }
        }
        debug!(room = id.0, "detached room");
        self.rooms.remove(&id)
    }

    /// Listing shown by `listrooms`
    pub fn listing(&self) -> String {
        if self.rooms.is_empty() {
            return "The world does not have any rooms yet.".to_string();
        }
        let mut out = String::from("The world currently contains the following rooms:");
        for room in self.rooms.values() {
            out.push_str(&format!("\n  {} ({})", room.id(), room.room_type()));
        }
        out
    }
}
