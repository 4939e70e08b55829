//! Items and the registry that owns them
//!
//! Rooms and the player only ever hold [`ItemId`]s; the [`ItemRegistry`] is
//! the single owner of every [`Item`] in a world.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Unique identifier for items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Placeholder written to save files for "no item"
    pub const NONE: ItemId = ItemId(0);

    /// The following id, or `None` at the top of the id space
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(ItemId)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ItemId> for u32 {
    fn from(id: ItemId) -> u32 {
        id.0
    }
}

/// A pick-up-able object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    name: String,
    aliases: BTreeSet<String>,
    description: String,
    size: u32,
    weight: u32,
}

impl Item {
    /// Create an item whose alias set holds just its canonical name
    pub fn new(id: ItemId, name: impl Into<String>, size: u32, weight: u32) -> Self {
        let name = single_line(name.into());
        let mut aliases = BTreeSet::new();
        aliases.insert(name.clone());
        Self {
            id,
            name,
            aliases,
            description: String::new(),
            size,
            weight,
        }
    }

    /// Blank item used while reading save data
    pub(crate) fn unnamed(id: ItemId) -> Self {
        Self {
            id,
            name: String::new(),
            aliases: BTreeSet::new(),
            description: String::new(),
            size: 0,
            weight: 0,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(String::as_str)
    }

    /// Add an acceptable name; the first name ever added becomes canonical
    pub fn add_name(&mut self, name: impl Into<String>) {
        let name = single_line(name.into());
        if self.name.is_empty() {
            self.name = name.clone();
        }
        self.aliases.insert(name);
    }

    /// Whether `name` is one of this item's acceptable names
    pub fn has_name(&self, name: &str) -> bool {
        self.aliases.contains(name)
    }

    /// Set the room text for this item. Names and descriptions are stored
    /// as one line each, so embedded line breaks become spaces.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = single_line(description.into());
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    pub(crate) fn set_weight(&mut self, weight: u32) {
        self.weight = weight;
    }
}

fn single_line(text: String) -> String {
    if text.contains(['\n', '\r']) {
        text.lines().collect::<Vec<_>>().join(" ")
    } else {
        text
    }
}

/// Owner of every item in a world, with a monotonic id allocator
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: BTreeMap<ItemId, Item>,
    next_id: ItemId,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: ItemId(1),
        }
    }
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a new item, returning its fresh id
    pub fn create<I, S>(
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
        let id = self.allocate();
        let mut item = Item::new(id, name, size, weight);
        for alias in aliases {
            item.add_name(alias);
        }
        item.set_description(description);
        self.items.insert(id, item);
        id
    }

    /// Hand out the next id. Once the counter reaches the top of the id
    /// space, the lowest unused id is reused instead.
    fn allocate(&mut self) -> ItemId {
        let id = self.next_id;
        match id.next() {
            Some(after) => {
                self.next_id = after;
                id
            }
            None => (1..=u32::MAX)
                .map(ItemId)
                .find(|id| !self.items.contains_key(id))
                .unwrap_or(id),
        }
    }

    /// Register an item read from save data, advancing the allocator past its
    /// id. Returns `false` and registers nothing when the id is the last one
    /// in the id space, which the allocator cannot move past.
    pub fn insert_loaded(&mut self, item: Item) -> bool {
        let id = item.id();
        let Some(after) = id.next() else {
            return false;
        };
        if after > self.next_id {
            self.next_id = after;
        }
        self.items.insert(id, item);
        true
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    /// Id the next created item will receive
    pub fn next_id(&self) -> ItemId {
        self.next_id
    }

    /// First item (in table order) whose alias set contains `name`.
    ///
    /// Several items may share an alias; the lowest id wins.
    pub fn find_by_name(&self, name: &str) -> Option<ItemId> {
        self.items
            .values()
            .find(|item| item.has_name(name))
            .map(Item::id)
    }

    /// Display name for messages, falling back to the raw id
    pub fn name_of(&self, id: ItemId) -> String {
        self.get(id)
            .map(|item| item.name().to_string())
            .unwrap_or_else(|| format!("item {}", id))
    }

    /// Listing shown by `listitems`
    pub fn listing(&self) -> String {
        if self.items.is_empty() {
            return "The world does not have any items yet.".to_string();
        }
        let mut out = String::from("The world currently contains the following items:");
        for item in self.items.values() {
            out.push_str(&format!(
                "\n  {} (ID: {}, weight: {})",
                item.name(),
                item.id(),
                item.weight()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_has_canonical_alias() {
        let item = Item::new(ItemId(4), "lamp", 2, 3);
        assert!(item.has_name("lamp"));
        assert_eq!(item.name(), "lamp");
        assert_eq!(item.aliases().count(), 1);
    }

    #[test]
    fn test_first_added_name_is_canonical() {
        let mut item = Item::unnamed(ItemId(1));
        item.add_name("brass key");
        item.add_name("key");
        assert_eq!(item.name(), "brass key");
        assert!(item.has_name("key"));
        assert!(!item.has_name("door"));
    }

    #[test]
    fn test_line_breaks_flattened() {
        let mut item = Item::new(ItemId(1), "old\nlamp", 1, 1);
        item.set_description("A lamp.\r\nIt flickers.\n");
        assert_eq!(item.name(), "old lamp");
        assert_eq!(item.description(), "A lamp. It flickers.");
    }

    #[test]
    fn test_registry_ids_are_sequential() {
        let mut reg = ItemRegistry::new();
        let a = reg.create("apple", ["fruit"], "An apple.", 1, 1);
        let b = reg.create("bread", Vec::<String>::new(), "A loaf.", 1, 1);
        assert_eq!(a, ItemId(1));
        assert_eq!(b, ItemId(2));
        assert!(reg.get(a).unwrap().has_name("fruit"));
    }

    #[test]
    fn test_loaded_ids_advance_allocator() {
        let mut reg = ItemRegistry::new();
        reg.insert_loaded(Item::new(ItemId(9), "old", 0, 0));
        assert_eq!(reg.next_id(), ItemId(10));

        reg.insert_loaded(Item::new(ItemId(3), "older", 0, 0));
        assert_eq!(reg.next_id(), ItemId(10));

        let fresh = reg.create("new", Vec::<String>::new(), "", 0, 0);
        assert_eq!(fresh, ItemId(10));
    }

    #[test]
    fn test_last_id_rejected_on_load() {
        let mut reg = ItemRegistry::new();
        assert!(!reg.insert_loaded(Item::new(ItemId(u32::MAX), "edge", 0, 0)));
        assert!(reg.is_empty());
        assert_eq!(reg.next_id(), ItemId(1));
    }

    #[test]
    fn test_exhausted_allocator_reuses_free_ids() {
        let mut reg = ItemRegistry::new();
        assert!(reg.insert_loaded(Item::new(ItemId(u32::MAX - 1), "edge", 0, 0)));
        assert_eq!(reg.next_id(), ItemId(u32::MAX));

        let a = reg.create("a", Vec::<String>::new(), "", 0, 0);
        let b = reg.create("b", Vec::<String>::new(), "", 0, 0);
        assert_eq!(a, ItemId(1));
        assert_eq!(b, ItemId(2));
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let mut reg = ItemRegistry::new();
        let a = reg.create("a", Vec::<String>::new(), "", 0, 0);
        reg.remove(a);
        let b = reg.create("b", Vec::<String>::new(), "", 0, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_find_by_name_lowest_id_wins() {
        let mut reg = ItemRegistry::new();
        let first = reg.create("coin", ["gold"], "", 0, 0);
        reg.create("nugget", ["gold"], "", 0, 0);
        assert_eq!(reg.find_by_name("gold"), Some(first));
        assert_eq!(reg.find_by_name("silver"), None);
    }

    #[test]
    fn test_listing() {
        let mut reg = ItemRegistry::new();
        assert_eq!(reg.listing(), "The world does not have any items yet.");
        reg.create("rope", Vec::<String>::new(), "", 2, 4);
        assert!(reg.listing().contains("rope (ID: 1, weight: 4)"));
    }
}
