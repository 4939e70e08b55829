//! Building and pruning the world graph

use std::collections::BTreeSet;

use tracing::debug;

use super::{Console, World};
use crate::action::{ActionResult, Direction};
use crate::item::ItemId;
use crate::room::{RoomId, RoomType};

const CANCEL_ITEM: &str = "Canceling creation of new item.";

/// Leading integer of `text` the way C's `atoi` reads it: optional
/// whitespace and sign, then digits up to the first non-digit. Zero when
/// there is no number; saturates instead of overflowing.
pub(crate) fn atoi(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    if negative { -value } else { value }
}

impl World {
    /// Resolve an item argument: a positive number is an id, anything else
    /// is looked up by name. `None` when neither finds an item.
    pub fn find_item_id(&self, arg: &str) -> Option<ItemId> {
        match u32::try_from(atoi(arg)) {
            Ok(id) if id > 0 => Some(ItemId(id)),
            _ => self.items.find_by_name(arg),
        }
    }

    /// Make an exit from the current room.
    ///
    /// An empty argument creates a basic room, `cond` a condition room and
    /// `switch` a switch room; a number links to that existing room.
    pub fn add_exit(&mut self, dir: Direction, arg: &str) -> ActionResult {
        let here = self.player.location();
        if self.rooms.get(here).and_then(|room| room.stored_exit(dir)).is_some() {
            return ActionResult::failure("A room already exists in that direction.");
        }

        let (room_type, created) = match arg {
            "" => (RoomType::Basic, "Created new basic room."),
            "cond" => (RoomType::Condition, "Created new condition room."),
            "switch" => (RoomType::Switch, "Created new switch room."),
            _ => return self.link_existing(here, dir, arg),
        };

        let id = self.rooms.create(room_type);
        let res = self.rooms.set_exit(here, dir, id);
        if !res.is_success() {
            self.rooms.detach(id);
            return res;
        }
        ActionResult::success(created)
    }

    fn link_existing(&mut self, here: RoomId, dir: Direction, arg: &str) -> ActionResult {
        let value = atoi(arg);
        if value <= 0 {
            return ActionResult::failure(format!(
                "\"{}\" is not a valid room type or ID\nUse an argument of \"cond\" for a new \
                 condition room or \"switch\" for a new switch room.",
                arg
            ));
        }
        let target = u32::try_from(value).map(RoomId).ok().filter(|id| self.rooms.contains(*id));
        let Some(target) = target else {
            return ActionResult::failure(format!("Cannot find a room with an ID of {}.", value));
        };

        let res = self.rooms.set_exit(here, dir, target);
        if res.is_success() {
            res.with_message(format!("Linked to room ID {}.", target))
        } else {
            res
        }
    }

    /// Create an item in the current room and return its id
    pub fn add_item<I, S>(
        &mut self,
        name: &str,
        aliases: I,
        description: &str,
        size: u32,
        weight: u32,
    ) -> ItemId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = self.items.create(name, aliases, description, size, weight);
        if let Some(room) = self.rooms.get_mut(self.player.location()) {
            room.add_item(id);
        }
        debug!(item = id.0, name, "created item");
        id
    }

    /// Ask for a new item's details and place it in the current room
    pub fn create_item(&mut self, console: &mut dyn Console) -> ActionResult {
        console.prompt(
            "Enter the name of the item, followed by aliases.\n\
             Press Enter on a blank line when you are done.",
        );
        let names: Vec<String> = std::iter::from_fn(|| console.read_line())
            .take_while(|line| !line.is_empty())
            .collect();
        let Some((name, aliases)) = names.split_first() else {
            return ActionResult::abort(CANCEL_ITEM);
        };

        console.prompt(
            "Enter how you want the item to be described in the room.\n\
             The item will be invisible if you do not enter any text.",
        );
        let Some(description) = console.read_line() else {
            return ActionResult::abort(CANCEL_ITEM);
        };

        console.prompt(&format!(
            "Enter the size of the item. \nUse a size larger than {} if you don't want the player to pick it up.",
            self.player.limits.max_size
        ));
        let Some(size) = read_count(console, "Invalid size. Enter an integer greater than 0: ") else {
            return ActionResult::abort(CANCEL_ITEM);
        };

        console.prompt(&format!(
            "Enter the weight of the item. The player can currently hold up to {} pounds.",
            self.player.limits.max_weight
        ));
        let Some(weight) = read_count(console, "Invalid weight. Enter an integer greater than 0: ")
        else {
            return ActionResult::abort(CANCEL_ITEM);
        };

        self.add_item(name, aliases.iter().cloned(), &description, size, weight);
        ActionResult::success(format!("Created a new '{}' item.", name))
    }

    /// Set the current room's description from `arg`, or ask for one
    pub fn edit_description(&mut self, arg: &str, console: &mut dyn Console) -> ActionResult {
        let text = if arg.is_empty() {
            console.prompt(
                "Enter a new description one line at a time.\n\
                 Press Enter with no input to keep the old one.\n\
                 When you are done entering the description, press Enter twice.",
            );
            let block = console.read_block();
            if block.is_empty() {
                return ActionResult::abort("Keeping old description.");
            }
            block
        } else {
            format!("{}\n", arg)
        };

        match self.rooms.get_mut(self.player.location()) {
            Some(room) => room.set_description(text),
            None => ActionResult::failure("Room not found."),
        }
    }

    /// Ask for a new introduction
    pub fn set_intro(&mut self, console: &mut dyn Console) -> ActionResult {
        console.prompt(
            "Enter a new introduction one line at a time.\n\
             Press Enter with no input to keep the old one.\n\
             When you are done, press Enter twice.",
        );
        let block = console.read_block();
        if block.is_empty() {
            return ActionResult::abort("Keeping old introduction.");
        }
        self.intro = block;
        ActionResult::success("Introduction updated.")
    }

    pub fn set_intro_text(&mut self, text: impl Into<String>) {
        self.intro = text.into();
    }

    /// Remove a room and every reference to it
    pub fn delete_room(&mut self, id: RoomId) -> ActionResult {
        if !self.rooms.contains(id) {
            return ActionResult::failure("Room not found.");
        }
        if id == self.player.location() {
            return ActionResult::failure("You cannot delete the room you are in.");
        }

        self.remove_room(id);
        ActionResult::success(format!("Permanently deleted room ID {}.", id))
    }

    fn remove_room(&mut self, id: RoomId) {
        self.rooms.detach(id);
        if self.start == id {
            self.start = self.player.location();
        }
        if self.end == Some(id) {
            self.end = None;
        }
        debug!(room = id.0, "deleted room");
    }

    /// Remove an item from the inventory, every room and every required slot
    pub fn delete_item(&mut self, id: ItemId) -> ActionResult {
        let Some(item) = self.items.get(id) else {
            return ActionResult::failure("Item not found.");
        };
        let name = item.name().to_string();

        self.remove_item(id);
        ActionResult::success(format!("Permanently deleted item ID {} ({}).", id, name))
    }

    fn remove_item(&mut self, id: ItemId) {
        self.player.forget_item(id);
        self.rooms.forget_item(id);
        self.items.remove(id);
        debug!(item = id.0, "deleted item");
    }

    /// Remove rooms nothing links to and items nobody holds.
    ///
    /// Single pass: a room is kept when any room's exit names it, or it is
    /// the player's room, the start or the end. Items are kept when a kept
    /// room or the inventory holds them.
    pub fn clean_up_orphans(&mut self) -> ActionResult {
        let mut kept_rooms: BTreeSet<RoomId> = self
            .rooms
            .iter()
            .flat_map(|room| room.exits().into_iter().flatten())
            .collect();
        kept_rooms.insert(self.player.location());
        kept_rooms.insert(self.start);
        kept_rooms.extend(self.end);

        let mut kept_items: BTreeSet<ItemId> = self.player.inventory().clone();
        for id in &kept_rooms {
            if let Some(room) = self.rooms.get(*id) {
                kept_items.extend(room.items().iter().copied());
            }
        }

        let dead_items: Vec<ItemId> = self.items.ids().filter(|id| !kept_items.contains(id)).collect();
        let dead_rooms: Vec<RoomId> = self.rooms.ids().filter(|id| !kept_rooms.contains(id)).collect();

        for id in &dead_items {
            self.remove_item(*id);
        }
        for id in &dead_rooms {
            self.remove_room(*id);
        }
        debug!(items = dead_items.len(), rooms = dead_rooms.len(), "swept orphans");

        ActionResult::success(format!(
            "Removing item IDs: {}\nRemoving room IDs: {}",
            join_ids(&dead_items),
            join_ids(&dead_rooms)
        ))
    }
}

/// Read a non-negative integer line, re-prompting until one arrives
fn read_count(console: &mut dyn Console, retry: &str) -> Option<u32> {
    loop {
        let line = console.read_line()?;
        match line.trim().parse::<u32>() {
            Ok(value) => return Some(value),
            Err(_) => console.prompt(retry),
        }
    }
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
