//! The world: aggregate root owning rooms, items and the player
//!
//! Every id stored anywhere in a world (exits, switch targets, required
//! items, room contents, inventory, start and end rooms, player location)
//! resolves in the world's own tables. Deletions purge references first.

mod clock;
mod codec;
mod console;
mod dispatch;
mod edit;

pub use codec::CodecError;
pub use console::{Console, ScriptedConsole};

use std::path::{Path, PathBuf};

use crate::item::ItemRegistry;
use crate::options::WorldOptions;
use crate::player::Player;
use crate::room::{Room, RoomId, RoomTable, RoomType};

#[derive(Debug, Clone)]
pub struct World {
    rooms: RoomTable,
    items: ItemRegistry,
    player: Player,
    start: RoomId,
    end: Option<RoomId>,
    edit_mode: bool,
    intro: String,
    /// Seconds allowed to reach the end room
    time_limit: i64,
    /// Unix timestamp the countdown runs from
    start_time: i64,
    won_game: bool,
    save_path: PathBuf,
}

impl World {
    /// A fresh world holding a single basic room, which is also the start
    pub fn new(options: &WorldOptions) -> Self {
        let mut rooms = RoomTable::new();
        let start = rooms.create(RoomType::Basic);
        Self::from_parts(rooms, ItemRegistry::new(), start, options)
    }

    /// Assemble a world around existing tables, player standing at `start`
    pub(crate) fn from_parts(
        rooms: RoomTable,
        items: ItemRegistry,
        start: RoomId,
        options: &WorldOptions,
    ) -> Self {
        Self {
            rooms,
            items,
            player: Player::new(start, options.limits),
            start,
            end: None,
            edit_mode: options.edit,
            intro: String::new(),
            time_limit: options.time_limit,
            start_time: clock::now(),
            won_game: false,
            save_path: options.file.clone(),
        }
    }

    pub fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    pub fn rooms_mut(&mut self) -> &mut RoomTable {
        &mut self.rooms
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The room the player is standing in
    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.get(self.player.location())
    }

    pub fn start(&self) -> RoomId {
        self.start
    }

    pub fn end(&self) -> Option<RoomId> {
        self.end
    }

    /// Make the player's current room the start room
    pub fn set_start_here(&mut self) {
        self.start = self.player.location();
    }

    /// Make the player's current room the goal
    pub fn set_end_here(&mut self) {
        self.end = Some(self.player.location());
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
    }

    pub fn intro(&self) -> &str {
        &self.intro
    }

    pub fn time_limit(&self) -> i64 {
        self.time_limit
    }

    pub fn set_time_limit(&mut self, seconds: i64) {
        self.time_limit = seconds;
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Restart the countdown from `now`
    pub fn reset_clock(&mut self, now: i64) {
        self.start_time = now;
    }

    pub fn won_game(&self) -> bool {
        self.won_game
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn set_save_path(&mut self, path: impl Into<PathBuf>) {
        self.save_path = path.into();
    }

    /// Render the current room, as shown before each prompt
    pub fn view(&self) -> String {
        self.current_room()
            .map(|room| room.view(self.edit_mode, &self.items))
            .unwrap_or_default()
    }
}
