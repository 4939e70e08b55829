//! tw-core: Core engine for the textworld adventure
//!
//! This crate contains the room graph, the item registry, the player model,
//! the command vocabulary and the save-file codec. It never talks to the
//! terminal directly; interactive text entry goes through the [`Console`]
//! trait supplied by the caller.

pub mod action;
pub mod command;
pub mod item;
pub mod options;
pub mod persist;
pub mod player;
pub mod room;
pub mod world;

mod consts;

pub use action::{ActionResult, Direction, ResultKind};
pub use command::{Command, Operation};
pub use consts::*;
pub use item::{Item, ItemId, ItemRegistry};
pub use options::WorldOptions;
pub use player::{Player, PlayerLimits};
pub use room::{Room, RoomId, RoomKind, RoomTable, RoomType};
pub use world::{Console, ScriptedConsole, World};
