//! Line-oriented save format
//!
//! Sections are written in dependency order: items, then rooms (which hold
//! item ids), then exits and switch targets (which need every room to exist
//! already), then the introduction, clock, start/end rooms and the player.
//! Multi-line text is framed by `##NAME##` / `##ENDNAME##` marker lines.
//! Id `0` stands for "none".

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use super::World;
use crate::action::{ActionResult, Direction};
use crate::item::{Item, ItemId, ItemRegistry};
use crate::options::WorldOptions;
use crate::player::PlayerLimits;
use crate::room::{Room, RoomId, RoomKind, RoomTable, RoomType};

const ITEMS: &str = "##ITEMS##";
const END_ITEMS: &str = "##ENDITEMS##";
const ITEM_NAMES: &str = "##ITEMNAMES##";
const END_ITEM_NAMES: &str = "##ENDITEMNAMES##";
const ROOMS: &str = "##ROOMS##";
const END_ROOMS: &str = "##ENDROOMS##";
const ROOM_DESCRIPTION: &str = "##ROOMDESCRIPTION##";
const END_ROOM_DESCRIPTION: &str = "##ENDROOMDESCRIPTION##";
const ROOM_ALT_DESCRIPTION: &str = "##ROOMALTDESCRIPTION##";
const END_ROOM_ALT_DESCRIPTION: &str = "##ENDROOMALTDESCRIPTION##";
const ROOM_EXITS: &str = "##ROOMEXITS##";
const END_ROOM_EXITS: &str = "##ENDROOMEXITS##";
const ROOM_TARGETS: &str = "##ROOMTARGETS##";
const END_ROOM_TARGETS: &str = "##ENDROOMTARGETS##";
const INTRO: &str = "##INTRO##";
const END_INTRO: &str = "##ENDINTRO##";
const PLAYER: &str = "##PLAYER##";

/// Errors raised while decoding save data
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("expected `{expected}`, found `{found}`")]
    InvalidHeader { expected: &'static str, found: String },

    #[error("unknown room type `{0}`")]
    UnknownRoomType(String),

    #[error("unknown room id {0}")]
    UnknownRoom(u32),

    #[error("malformed number `{0}`")]
    InvalidNumber(String),

    #[error("unexpected end of save data")]
    UnexpectedEof,
}

impl CodecError {
    /// Message reported to the player when a load fails
    pub fn player_message(&self) -> &'static str {
        match self {
            CodecError::Io(_) => "Cannot read save data file.",
            CodecError::UnknownRoomType(_) => "Unknown room type encountered.",
            _ => "Invalid save data.",
        }
    }
}

/// Reads save data one line at a time, line terminators removed
struct Lines<R> {
    reader: R,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self { reader }
    }

    fn try_next(&mut self) -> Result<Option<String>, CodecError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn next(&mut self) -> Result<String, CodecError> {
        self.try_next()?.ok_or(CodecError::UnexpectedEof)
    }

    fn expect(&mut self, header: &'static str) -> Result<(), CodecError> {
        let line = self.next()?;
        if line == header {
            Ok(())
        } else {
            Err(CodecError::InvalidHeader {
                expected: header,
                found: line,
            })
        }
    }

    fn number<T: FromStr>(&mut self) -> Result<T, CodecError> {
        let line = self.next()?;
        parse_number(&line)
    }

    fn flag(&mut self) -> Result<bool, CodecError> {
        Ok(self.number::<u32>()? != 0)
    }

    /// Lines up to `end`, each kept with its newline
    fn block(&mut self, end: &str) -> Result<String, CodecError> {
        let mut text = String::new();
        loop {
            let line = self.next()?;
            if line == end {
                return Ok(text);
            }
            text.push_str(&line);
            text.push('\n');
        }
    }
}

fn parse_number<T: FromStr>(text: &str) -> Result<T, CodecError> {
    text.trim()
        .parse()
        .map_err(|_| CodecError::InvalidNumber(text.to_string()))
}

fn id_list(line: &str) -> Result<Vec<u32>, CodecError> {
    line.split_whitespace().map(parse_number).collect()
}

/// Write text so the closing marker lands on its own line
fn write_block<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}

fn write_ids<W: Write, T: std::fmt::Display>(
    out: &mut W,
    ids: impl IntoIterator<Item = T>,
) -> io::Result<()> {
    for id in ids {
        write!(out, "{} ", id)?;
    }
    writeln!(out)
}

fn raw<T: Into<u32>>(id: Option<T>) -> u32 {
    id.map(Into::into).unwrap_or(0)
}

impl World {
    /// Write the whole world in save format
    pub fn serialize<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", ITEMS)?;
        for item in self.items.iter() {
            write_item(out, item)?;
        }
        writeln!(out, "{}", END_ITEMS)?;

        writeln!(out, "{}", ROOMS)?;
        for room in self.rooms.iter() {
            write_room(out, room)?;
        }
        writeln!(out, "{}", END_ROOMS)?;

        writeln!(out, "{}", ROOM_EXITS)?;
        for room in self.rooms.iter() {
            let [n, e, s, w] = room.exits().map(raw);
            writeln!(out, "{} {} {} {} {}", room.id(), n, e, s, w)?;
        }
        writeln!(out, "{}", END_ROOM_EXITS)?;

        writeln!(out, "{}", ROOM_TARGETS)?;
        for room in self.rooms.iter() {
            writeln!(out, "{} {}", room.id(), raw(room.target()))?;
        }
        writeln!(out, "{}", END_ROOM_TARGETS)?;

        writeln!(out, "{}", INTRO)?;
        write_block(out, &self.intro)?;
        writeln!(out, "{}", END_INTRO)?;
        writeln!(out, "{}", self.time_limit)?;
        writeln!(out, "{}", self.start)?;
        writeln!(out, "{}", raw(self.end))?;

        writeln!(out, "{}", PLAYER)?;
        let limits = self.player.limits;
        writeln!(out, "{}", limits.max_weight)?;
        writeln!(out, "{}", limits.max_size)?;
        writeln!(out, "{}", limits.max_quantity)?;
        write_ids(out, self.player.inventory().iter())?;
        Ok(())
    }

    /// Serialize into a string
    pub fn to_save_string(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.serialize(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Decode a world from save data. Edit mode and the save path come from
    /// `options`; everything else comes from the data.
    pub fn deserialize<R: BufRead>(reader: R, options: &WorldOptions) -> Result<World, CodecError> {
        let mut lines = Lines::new(reader);

        lines.expect(ITEMS)?;
        let items = read_items(&mut lines)?;

        lines.expect(ROOMS)?;
        let mut rooms = read_rooms(&mut lines, &items)?;

        lines.expect(ROOM_EXITS)?;
        read_exits(&mut lines, &mut rooms)?;

        lines.expect(ROOM_TARGETS)?;
        read_targets(&mut lines, &mut rooms)?;

        lines.expect(INTRO)?;
        let intro = lines.block(END_INTRO)?;
        let time_limit: i64 = lines.number()?;
        let start_id: u32 = lines.number()?;
        let end_id: u32 = lines.number()?;

        let start = match rooms.first_id() {
            None => rooms.create(RoomType::Basic),
            Some(first) => Some(RoomId(start_id))
                .filter(|id| rooms.contains(*id))
                .unwrap_or(first),
        };
        let end = Some(RoomId(end_id)).filter(|id| rooms.contains(*id));

        lines.expect(PLAYER)?;
        let limits = PlayerLimits {
            max_weight: lines.number()?,
            max_size: lines.number()?,
            max_quantity: lines.number()?,
        };
        let inventory = match lines.try_next()? {
            Some(line) => id_list(&line)?,
            None => Vec::new(),
        };

        let mut world = World::from_parts(rooms, items, start, options);
        world.end = end;
        world.intro = intro;
        world.time_limit = time_limit;
        world.player.limits = limits;
        for raw_id in inventory {
            let id = ItemId(raw_id);
            if world.items.contains(id) {
                world.player.insert_item(id);
            } else {
                warn!(item = raw_id, "inventory names unknown item, skipped");
            }
        }

        info!(
            rooms = world.rooms.len(),
            items = world.items.len(),
            "decoded world"
        );
        Ok(world)
    }

    /// Replace this world with one decoded from `reader`. On failure the
    /// current world is left untouched.
    pub fn load<R: BufRead>(&mut self, reader: R) -> ActionResult {
        let options = WorldOptions {
            file: self.save_path.clone(),
            time_limit: self.time_limit,
            limits: self.player.limits,
            edit: self.edit_mode,
        };
        match World::deserialize(reader, &options) {
            Ok(world) => {
                *self = world;
                ActionResult::success("World data successfully loaded.")
            }
            Err(err) => {
                warn!(error = %err, "failed to load world");
                ActionResult::failure(err.player_message())
            }
        }
    }
}

fn write_item<W: Write>(out: &mut W, item: &Item) -> io::Result<()> {
    writeln!(out, "{}", item.id())?;
    writeln!(out, "{}", ITEM_NAMES)?;
    writeln!(out, "{}", item.name())?;
    for alias in item.aliases().filter(|alias| *alias != item.name()) {
        writeln!(out, "{}", alias)?;
    }
    writeln!(out, "{}", END_ITEM_NAMES)?;
    writeln!(out, "{}", item.description())?;
    writeln!(out, "{}", item.size())?;
    writeln!(out, "{}", item.weight())
}

fn write_room<W: Write>(out: &mut W, room: &Room) -> io::Result<()> {
    writeln!(out, "{}", room.room_type())?;
    writeln!(out, "{}", room.id())?;
    match room.kind() {
        RoomKind::Basic => {}
        RoomKind::Condition(state) => {
            writeln!(out, "{}", raw(state.required))?;
            writeln!(out, "{}", u8::from(state.enabled))?;
            for dir in Direction::ALL {
                writeln!(out, "{}", u8::from(state.is_toggle_controlled(dir)))?;
            }
        }
        RoomKind::Switch(state) => {
            writeln!(out, "{}", raw(state.required))?;
            writeln!(out, "{}", u8::from(state.enabled))?;
        }
    }

    writeln!(out, "{}", ROOM_DESCRIPTION)?;
    write_block(out, room.description())?;
    writeln!(out, "{}", END_ROOM_DESCRIPTION)?;
    if let Some(alt) = room.alt_description() {
        writeln!(out, "{}", ROOM_ALT_DESCRIPTION)?;
        write_block(out, alt)?;
        writeln!(out, "{}", END_ROOM_ALT_DESCRIPTION)?;
    }
    write_ids(out, room.items().iter())
}

fn read_items<R: BufRead>(lines: &mut Lines<R>) -> Result<ItemRegistry, CodecError> {
    let mut items = ItemRegistry::new();
    loop {
        let line = lines.next()?;
        if line == END_ITEMS {
            return Ok(items);
        }
        let mut item = Item::unnamed(ItemId(parse_number(&line)?));

        lines.expect(ITEM_NAMES)?;
        loop {
            let name = lines.next()?;
            if name == END_ITEM_NAMES {
                break;
            }
            item.add_name(name);
        }
        item.set_description(lines.next()?);
        item.set_size(lines.number()?);
        item.set_weight(lines.number()?);
        let id = item.id();
        if !items.insert_loaded(item) {
            return Err(CodecError::InvalidNumber(id.to_string()));
        }
    }
}

fn read_required<R: BufRead>(
    lines: &mut Lines<R>,
    items: &ItemRegistry,
) -> Result<Option<ItemId>, CodecError> {
    let raw_id: u32 = lines.number()?;
    let id = ItemId(raw_id);
    if raw_id == 0 {
        Ok(None)
    } else if items.contains(id) {
        Ok(Some(id))
    } else {
        warn!(item = raw_id, "required item does not exist, cleared");
        Ok(None)
    }
}

fn read_rooms<R: BufRead>(lines: &mut Lines<R>, items: &ItemRegistry) -> Result<RoomTable, CodecError> {
    let mut rooms = RoomTable::new();
    loop {
        let tag = lines.next()?;
        if tag == END_ROOMS {
            return Ok(rooms);
        }
        let room_type =
            RoomType::from_str(&tag).map_err(|_| CodecError::UnknownRoomType(tag.clone()))?;
        let mut room = Room::new(RoomId(lines.number()?), room_type);

        match room.kind_mut() {
            RoomKind::Basic => {}
            RoomKind::Condition(state) => {
                state.required = read_required(lines, items)?;
                state.enabled = lines.flag()?;
                for dir in Direction::ALL {
                    let controlled = lines.flag()?;
                    state.set_toggle_controlled(dir, controlled);
                }
            }
            RoomKind::Switch(state) => {
                state.required = read_required(lines, items)?;
                state.enabled = lines.flag()?;
            }
        }

        lines.expect(ROOM_DESCRIPTION)?;
        room.set_base_description(lines.block(END_ROOM_DESCRIPTION)?);
        if room_type != RoomType::Basic {
            lines.expect(ROOM_ALT_DESCRIPTION)?;
            room.set_alt_description(lines.block(END_ROOM_ALT_DESCRIPTION)?);
        }

        for raw_id in id_list(&lines.next()?)? {
            let id = ItemId(raw_id);
            if items.contains(id) {
                room.add_item(id);
            } else {
                warn!(room = room.id().0, item = raw_id, "room holds unknown item, skipped");
            }
        }
        let id = room.id();
        if !rooms.insert_loaded(room) {
            return Err(CodecError::InvalidNumber(id.to_string()));
        }
    }
}

fn read_exits<R: BufRead>(lines: &mut Lines<R>, rooms: &mut RoomTable) -> Result<(), CodecError> {
    loop {
        let line = lines.next()?;
        if line == END_ROOM_EXITS {
            return Ok(());
        }
        let ids = id_list(&line)?;
        let Some((&room_id, exits)) = ids.split_first() else {
            return Err(CodecError::InvalidNumber(line));
        };

        let mut slots = [None; 4];
        for (slot, &target) in slots.iter_mut().zip(exits) {
            if target == 0 {
                continue;
            }
            if rooms.contains(RoomId(target)) {
                *slot = Some(RoomId(target));
            } else {
                warn!(room = room_id, target, "exit to unknown room, skipped");
            }
        }

        let room = rooms
            .get_mut(RoomId(room_id))
            .ok_or(CodecError::UnknownRoom(room_id))?;
        for (dir, slot) in Direction::ALL.into_iter().zip(slots) {
            room.set_exit_slot(dir, slot);
        }
    }
}

fn read_targets<R: BufRead>(lines: &mut Lines<R>, rooms: &mut RoomTable) -> Result<(), CodecError> {
    loop {
        let line = lines.next()?;
        if line == END_ROOM_TARGETS {
            return Ok(());
        }
        let ids = id_list(&line)?;
        let (room_id, target) = match ids.as_slice() {
            [room, target, ..] => (*room, *target),
            [room] => (*room, 0),
            [] => return Err(CodecError::InvalidNumber(line)),
        };
        if target == 0 {
            continue;
        }

        let target_exists = rooms.contains(RoomId(target));
        let room = rooms
            .get_mut(RoomId(room_id))
            .ok_or(CodecError::UnknownRoom(room_id))?;
        if target_exists {
            room.set_target(RoomId(target));
        } else {
            warn!(room = room_id, target, "switch target does not exist, skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(text: &str) -> Result<World, CodecError> {
        World::deserialize(Cursor::new(text), &WorldOptions::default())
    }

    const MINIMAL: &str = "##ITEMS##
1
##ITEMNAMES##
brass key
key
##ENDITEMNAMES##
A brass key lies here.
1
2
##ENDITEMS##
##ROOMS##
basic
1
##ROOMDESCRIPTION##
A hall.
##ENDROOMDESCRIPTION##
1
condition
2
1
0
1
0
0
0
##ROOMDESCRIPTION##
Lit.
##ENDROOMDESCRIPTION##
##ROOMALTDESCRIPTION##
Dark.
##ENDROOMALTDESCRIPTION##

##ENDROOMS##
##ROOMEXITS##
1 2 0 0 0
2 0 0 1 0
##ENDROOMEXITS##
##ROOMTARGETS##
1 0
2 0
##ENDROOMTARGETS##
##INTRO##
Welcome.
##ENDINTRO##
300
1
2
##PLAYER##
50
5
3

";

    #[test]
    fn test_decode_minimal() {
        let world = decode(MINIMAL).unwrap();
        assert_eq!(world.items().len(), 1);
        assert_eq!(world.rooms().len(), 2);
        assert_eq!(world.intro(), "Welcome.\n");
        assert_eq!(world.time_limit(), 300);
        assert_eq!(world.start(), RoomId(1));
        assert_eq!(world.end(), Some(RoomId(2)));
        assert_eq!(world.player().location(), RoomId(1));
        assert_eq!(world.player().limits.max_weight, 50);

        let key = world.items().get(ItemId(1)).unwrap();
        assert_eq!(key.name(), "brass key");
        assert!(key.has_name("key"));

        let hall = world.rooms().get(RoomId(1)).unwrap();
        assert_eq!(hall.description(), "A hall.\n");
        assert!(hall.has_item(ItemId(1)));
        assert_eq!(hall.stored_exit(Direction::North), Some(RoomId(2)));

        let cond = world.rooms().get(RoomId(2)).unwrap();
        assert_eq!(cond.required(), Some(ItemId(1)));
        assert_eq!(cond.is_enabled(), Some(false));
        assert_eq!(cond.alt_description(), Some("Dark.\n"));
        // North is toggle-controlled and the room is disabled
        assert_eq!(cond.exit(Direction::North), None);
        assert_eq!(cond.exit(Direction::South), Some(RoomId(1)));
    }

    #[test]
    fn test_roundtrip_is_stable() {
        let world = decode(MINIMAL).unwrap();
        let first = world.to_save_string();
        let again = decode(&first).unwrap().to_save_string();
        assert_eq!(first, again);
    }

    #[test]
    fn test_allocators_advance_past_loaded_ids() {
        let world = decode(MINIMAL).unwrap();
        assert_eq!(world.items().next_id(), ItemId(2));
        assert_eq!(world.rooms().next_id(), RoomId(3));
    }

    #[test]
    fn test_roundtrip_keeps_inventory_and_targets() {
        let mut world = World::new(&WorldOptions::default());
        world.add_exit(Direction::East, "switch");
        world.add_exit(Direction::West, "cond");
        let coin = world.add_item("coin", ["gold"], "A coin glints.", 1, 3);
        assert!(world.take(coin).is_success());
        world.player_mut().set_max_weight(40);
        world.player_mut().set_max_quantity(2);
        let res = world.rooms_mut().get_mut(RoomId(2)).unwrap().set_target(RoomId(3));
        assert!(res.is_success());

        let text = world.to_save_string();
        let loaded = decode(&text).unwrap();

        assert!(loaded.player().is_carrying(coin));
        assert!(!loaded.rooms().get(RoomId(1)).unwrap().has_item(coin));
        assert_eq!(loaded.rooms().get(RoomId(2)).unwrap().target(), Some(RoomId(3)));
        assert_eq!(loaded.player().limits.max_weight, 40);
        assert_eq!(loaded.player().limits.max_quantity, 2);
        assert_eq!(loaded.to_save_string(), text);
    }

    #[test]
    fn test_top_item_id_is_invalid() {
        let text = "##ITEMS##\n4294967295\n##ITEMNAMES##\nedge\n##ENDITEMNAMES##\n\n1\n1\n##ENDITEMS##\n";
        let err = decode(text).unwrap_err();
        assert!(matches!(err, CodecError::InvalidNumber(ref n) if n == "4294967295"));
        assert_eq!(err.player_message(), "Invalid save data.");
    }

    #[test]
    fn test_top_room_id_is_invalid() {
        let text = "##ITEMS##\n##ENDITEMS##\n##ROOMS##\nbasic\n4294967295\n\
                    ##ROOMDESCRIPTION##\nEdge.\n##ENDROOMDESCRIPTION##\n\n##ENDROOMS##\n";
        let err = decode(text).unwrap_err();
        assert!(matches!(err, CodecError::InvalidNumber(_)));

        let mut world = World::new(&WorldOptions::default());
        let res = world.load(Cursor::new(text));
        assert!(res.is_failure());
        assert_eq!(res.message, "Invalid save data.");
    }

    #[test]
    fn test_bad_header() {
        let err = decode("##ROOMS##\n").unwrap_err();
        assert!(matches!(err, CodecError::InvalidHeader { expected: ITEMS, .. }));
        assert_eq!(err.player_message(), "Invalid save data.");
    }

    #[test]
    fn test_unknown_room_type() {
        let err = decode("##ITEMS##\n##ENDITEMS##\n##ROOMS##\ncastle\n").unwrap_err();
        assert!(matches!(err, CodecError::UnknownRoomType(ref t) if t == "castle"));
        assert_eq!(err.player_message(), "Unknown room type encountered.");
    }

    #[test]
    fn test_truncated_data() {
        let cut = &MINIMAL[..MINIMAL.find("##PLAYER##").unwrap()];
        assert!(matches!(decode(cut), Err(CodecError::UnexpectedEof)));
    }

    #[test]
    fn test_empty_room_section_gets_start_room() {
        let text = "##ITEMS##\n##ENDITEMS##\n##ROOMS##\n##ENDROOMS##\n##ROOMEXITS##\n##ENDROOMEXITS##\n\
                    ##ROOMTARGETS##\n##ENDROOMTARGETS##\n##INTRO##\n##ENDINTRO##\n600\n0\n0\n##PLAYER##\n100\n10\n5\n";
        let world = decode(text).unwrap();
        assert_eq!(world.rooms().len(), 1);
        assert!(world.rooms().contains(world.start()));
        assert_eq!(world.end(), None);
    }

    #[test]
    fn test_load_failure_keeps_world() {
        let mut world = World::new(&WorldOptions::default());
        world.set_end_here();
        let res = world.load(Cursor::new("garbage\n"));
        assert!(res.is_failure());
        assert_eq!(res.message, "Invalid save data.");
        assert_eq!(world.end(), Some(RoomId(1)));
    }

    #[test]
    fn test_load_success_replaces_world() {
        let mut world = World::new(&WorldOptions::default());
        world.set_edit_mode(true);
        let res = world.load(Cursor::new(MINIMAL));
        assert!(res.is_success());
        assert_eq!(res.message, "World data successfully loaded.");
        assert_eq!(world.rooms().len(), 2);
        assert!(world.is_edit_mode());
    }
}
