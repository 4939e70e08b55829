//! The player: where they stand and what they carry

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{ActionResult, Direction};
use crate::consts::{DEFAULT_MAX_QUANTITY, DEFAULT_MAX_SIZE, DEFAULT_MAX_WEIGHT};
use crate::item::{ItemId, ItemRegistry};
use crate::room::{RoomId, RoomTable};

/// Carrying capacity, checked only when picking something up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerLimits {
    /// Heaviest total load in pounds
    pub max_weight: u32,
    /// Largest single item that fits in the bag
    pub max_size: u32,
    /// Number of items the bag holds
    pub max_quantity: u32,
}

impl Default for PlayerLimits {
    fn default() -> Self {
        Self {
            max_weight: DEFAULT_MAX_WEIGHT,
            max_size: DEFAULT_MAX_SIZE,
            max_quantity: DEFAULT_MAX_QUANTITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    location: RoomId,
    inventory: BTreeSet<ItemId>,
    pub limits: PlayerLimits,
}

impl Player {
    pub fn new(location: RoomId, limits: PlayerLimits) -> Self {
        Self {
            location,
            inventory: BTreeSet::new(),
            limits,
        }
    }

    pub fn location(&self) -> RoomId {
        self.location
    }

    pub fn inventory(&self) -> &BTreeSet<ItemId> {
        &self.inventory
    }

    pub fn is_carrying(&self, item: ItemId) -> bool {
        self.inventory.contains(&item)
    }

    pub(crate) fn insert_item(&mut self, item: ItemId) {
        self.inventory.insert(item);
    }

    /// Drop every reference to `item` without placing it anywhere
    pub(crate) fn forget_item(&mut self, item: ItemId) -> bool {
        self.inventory.remove(&item)
    }

    pub fn set_max_weight(&mut self, weight: u32) {
        self.limits.max_weight = weight;
    }

    pub fn set_max_size(&mut self, size: u32) {
        self.limits.max_size = size;
    }

    pub fn set_max_quantity(&mut self, quantity: u32) {
        self.limits.max_quantity = quantity;
    }

    /// Combined weight of everything carried, saturating at `u32::MAX`
    pub fn inventory_weight(&self, items: &ItemRegistry) -> u32 {
        self.inventory
            .iter()
            .filter_map(|id| items.get(*id))
            .fold(0u32, |total, item| total.saturating_add(item.weight()))
    }

    /// Pick up an item lying in the current room
    pub fn take(&mut self, rooms: &mut RoomTable, items: &ItemRegistry, id: ItemId) -> ActionResult {
        let Some(room) = rooms.get_mut(self.location) else {
            return ActionResult::failure("There is no such item here.");
        };
        let Some(item) = items.get(id).filter(|_| room.has_item(id)) else {
            return ActionResult::failure("There is no such item here.");
        };

        if item.size() > self.limits.max_size {
            return ActionResult::failure("That is too big to fit in your bag.");
        }
        let loaded = item.weight().checked_add(self.inventory_weight(items));
        if loaded.is_none_or(|weight| weight > self.limits.max_weight) {
            return ActionResult::failure("You are too encumbered to pick that up.");
        }
        if self.inventory.len() >= self.limits.max_quantity as usize {
            return ActionResult::failure("Your bag is already full. Drop something first.");
        }

        let res = room.remove_item(id);
        if !res.is_success() {
            return res;
        }
        self.inventory.insert(id);
        debug!(item = id.0, room = self.location.0, "picked up item");
        ActionResult::success(format!("You picked up the {}.", item.name()))
    }

    /// Put a carried item down in the current room
    pub fn drop_item(&mut self, rooms: &mut RoomTable, items: &ItemRegistry, id: ItemId) -> ActionResult {
        if !self.inventory.contains(&id) {
            return ActionResult::failure("You are not carrying that item.");
        }
        let Some(room) = rooms.get_mut(self.location) else {
            return ActionResult::failure("Item not found.");
        };

        let res = room.add_item(id);
        if !res.is_success() {
            return res;
        }
        self.inventory.remove(&id);
        debug!(item = id.0, room = self.location.0, "dropped item");
        ActionResult::success(format!("You dropped your {}.", items.name_of(id)))
    }

    /// Walk through the exit in `dir`, if it is open
    pub fn go(&mut self, rooms: &RoomTable, dir: Direction) -> ActionResult {
        match rooms.exit(self.location, dir) {
            Some(dest) => {
                self.location = dest;
                ActionResult::success("")
            }
            None => ActionResult::failure("You cannot go that way."),
        }
    }

    /// Use an item: carried items are offered to the room, anything else must
    /// be lying in the room itself
    pub fn use_item(&self, rooms: &mut RoomTable, id: ItemId) -> ActionResult {
        if self.inventory.contains(&id) {
            rooms.use_item(self.location, id)
        } else {
            rooms.use_item_by_id(self.location, id)
        }
    }

    /// Inventory listing with totals, as shown by `inventory`
    pub fn view_items(&self, items: &ItemRegistry) -> String {
        let mut out = if self.inventory.is_empty() {
            String::from("You are not carrying anything right now.")
        } else {
            String::from("Your bag contains the following items:")
        };
        for item in self.inventory.iter().filter_map(|id| items.get(*id)) {
            out.push_str(&format!(
                "\n  {} (ID: {}, weight: {})",
                item.name(),
                item.id(),
                item.weight()
            ));
        }
        out.push_str(&format!(
            "\n\nTotal weight:   {}/{} lbs max\nTotal quantity: {}/{} items max",
            self.inventory_weight(items),
            self.limits.max_weight,
            self.inventory.len(),
            self.limits.max_quantity
        ));
        out
    }
}
