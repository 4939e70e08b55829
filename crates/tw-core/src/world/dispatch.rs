//! Command dispatch: one match over every operation

use tracing::{debug, info, warn};

use super::edit::atoi;
use super::{Console, World};
use crate::action::{ActionResult, Direction};
use crate::command::{Command, Operation, help_text};
use crate::consts::MAX_TIME_LIMIT;
use crate::item::ItemId;
use crate::persist;
use crate::room::RoomId;

const NEED_ITEM: &str = "This command requires an item ID or name as an argument.";
const NEED_ROOM: &str = "This command requires a room ID as an argument.";

/// Parse a positive number argument, as the capacity setters require
fn positive(arg: &str) -> Option<u32> {
    u32::try_from(atoi(arg)).ok().filter(|v| *v > 0)
}

impl World {
    /// Read one line of player input and run it. Lines that do not name a
    /// command available in the current mode dispatch as invalid.
    pub fn run_line(&mut self, line: &str, console: &mut dyn Console) -> ActionResult {
        let (cmd, read) = Command::parse(line, self.edit_mode);
        if !cmd.is_valid() {
            debug!(line, reason = %read.message, "unrecognised input");
        }
        self.parse(&cmd, console)
    }

    /// Execute a parsed command against the world
    pub fn parse(&mut self, cmd: &Command, console: &mut dyn Console) -> ActionResult {
        let arg = cmd.argument.as_str();
        debug!(operation = %cmd.operation, arg, "dispatch");

        match cmd.operation {
            Operation::Help => ActionResult::success(help_text(self.edit_mode)),
            Operation::Exit => ActionResult::exit("Thank you for playing!"),
            Operation::Invalid => {
                ActionResult::failure("That command is invalid. Type 'help' for a list of commands.")
            }

            Operation::Move(dir) => self.go(dir),
            Operation::Take => self.with_item(arg, World::take),
            Operation::Drop => self.with_item(arg, World::drop_item),
            Operation::Use => self.with_item(arg, World::use_item),
            Operation::Inventory => ActionResult::success(self.player.view_items(&self.items)),

            Operation::MaxQuantity => match (arg.is_empty(), positive(arg)) {
                (true, _) => {
                    ActionResult::failure("Specify the number of items that can be held in inventory.")
                }
                (false, Some(n)) => {
                    self.player.set_max_quantity(n);
                    ActionResult::success("Maximum quantity updated.")
                }
                (false, None) => {
                    ActionResult::failure("You must enter a positive quantity greater than 0.")
                }
            },
            Operation::MaxSize => match (arg.is_empty(), positive(arg)) {
                (true, _) => ActionResult::failure(
                    "Specify the largest size of item that can be held in inventory.",
                ),
                (false, Some(n)) => {
                    self.player.set_max_size(n);
                    ActionResult::success("Maximum size updated.")
                }
                (false, None) => ActionResult::failure("You must enter a positive size greater than 0."),
            },
            Operation::MaxWeight => match (arg.is_empty(), positive(arg)) {
                (true, _) => ActionResult::failure(
                    "Specify the maximum total weight that can be held in inventory.",
                ),
                (false, Some(n)) => {
                    self.player.set_max_weight(n);
                    ActionResult::success("Maximum weight updated.")
                }
                (false, None) => {
                    ActionResult::failure("You must enter a positive quantity greater than 0.")
                }
            },

            Operation::MakeExit(dir) => self.add_exit(dir, arg),
            Operation::DeleteExit(dir) => self.rooms.clear_exit(self.player.location(), dir),
            Operation::ToggleExit(dir) => self.with_current_room(|room| room.toggle_exit(dir)),
            Operation::EditDescription => self.edit_description(arg, console),
            Operation::SetRequired => self.set_required(arg),
            Operation::SetTarget => self.set_target(arg),
            Operation::ClearRequired => self.with_current_room(|room| room.clear_required()),
            Operation::ClearTarget => self.with_current_room(|room| room.clear_target()),
            Operation::Toggle => self.rooms.toggle(self.player.location()),

            Operation::CreateItem => self.create_item(console),
            Operation::DeleteItem => match positive(arg) {
                Some(id) => self.delete_item(ItemId(id)),
                None => ActionResult::failure("This command requires an item ID as an argument."),
            },
            Operation::DeleteRoom => match positive(arg) {
                Some(id) => self.delete_room(RoomId(id)),
                None => ActionResult::failure(NEED_ROOM),
            },
            Operation::Clean => self.clean_up_orphans(),
            Operation::ListItems => ActionResult::success(self.items.listing()),
            Operation::ListRooms => ActionResult::success(self.rooms.listing()),

            Operation::Edit => {
                self.edit_mode = !self.edit_mode;
                info!(edit_mode = self.edit_mode, "edit mode toggled");
                ActionResult::success(if self.edit_mode {
                    "Edit mode enabled."
                } else {
                    "Edit mode disabled."
                })
            }
            Operation::Save => self.save(arg),
            Operation::SetIntro => self.set_intro(console),
            Operation::SetEnd => {
                self.set_end_here();
                ActionResult::success("Updated goal to current room.")
            }
            Operation::SetStart => {
                self.set_start_here();
                ActionResult::success("Updated starting point to current room.")
            }
            Operation::TimeLimit => match atoi(arg) {
                seconds @ 1..=MAX_TIME_LIMIT => {
                    self.set_time_limit(seconds);
                    ActionResult::success("Time limit updated.")
                }
                _ => ActionResult::failure("You must enter the time limit in seconds as an argument."),
            },
        }
    }

    /// Walk the player through an exit
    pub fn go(&mut self, dir: Direction) -> ActionResult {
        self.player.go(&self.rooms, dir)
    }

    pub fn take(&mut self, id: ItemId) -> ActionResult {
        self.player.take(&mut self.rooms, &self.items, id)
    }

    pub fn drop_item(&mut self, id: ItemId) -> ActionResult {
        self.player.drop_item(&mut self.rooms, &self.items, id)
    }

    pub fn use_item(&mut self, id: ItemId) -> ActionResult {
        self.player.use_item(&mut self.rooms, id)
    }

    /// Save to `arg`, or to the world's save path when empty
    pub fn save(&self, arg: &str) -> ActionResult {
        let path = if arg.is_empty() {
            self.save_path.clone()
        } else {
            arg.into()
        };
        match persist::save_world(self, &path) {
            Ok(()) => ActionResult::success("Game data saved."),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save failed");
                ActionResult::failure("Cannot open file for writing.")
            }
        }
    }

    fn with_item(
        &mut self,
        arg: &str,
        action: fn(&mut World, ItemId) -> ActionResult,
    ) -> ActionResult {
        if arg.is_empty() {
            return ActionResult::failure(NEED_ITEM);
        }
        let id = self.find_item_id(arg).unwrap_or(ItemId::NONE);
        action(self, id)
    }

    fn with_current_room(
        &mut self,
        edit: impl FnOnce(&mut crate::room::Room) -> ActionResult,
    ) -> ActionResult {
        match self.rooms.get_mut(self.player.location()) {
            Some(room) => edit(room),
            None => ActionResult::failure("Room not found."),
        }
    }

    fn set_required(&mut self, arg: &str) -> ActionResult {
        if arg.is_empty() {
            return ActionResult::failure(NEED_ITEM);
        }
        let Some(item) = self.find_item_id(arg).and_then(|id| self.items.get(id)) else {
            return ActionResult::failure("That item does not exist.");
        };
        let (id, name) = (item.id(), item.name().to_string());
        self.with_current_room(|room| room.set_required(id, &name))
    }

    fn set_target(&mut self, arg: &str) -> ActionResult {
        let Some(target) = positive(arg).map(RoomId) else {
            return ActionResult::failure(NEED_ROOM);
        };
        if !self.rooms.contains(target) {
            return ActionResult::failure("That room does not exist.");
        }
        self.with_current_room(|room| room.set_target(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ResultKind;
    use crate::options::WorldOptions;
    use crate::room::RoomType;
    use crate::world::ScriptedConsole;

    fn run(world: &mut World, line: &str) -> ActionResult {
        let (cmd, res) = Command::parse(line, world.is_edit_mode());
        if !res.is_success() {
            return res;
        }
        world.parse(&cmd, &mut ScriptedConsole::default())
    }

    fn edit_world() -> World {
        let mut options = WorldOptions::default();
        options.edit = true;
        World::new(&options)
    }

    #[test]
    fn test_exit_and_invalid() {
        let mut world = edit_world();
        let res = run(&mut world, "quit");
        assert_eq!(res.kind, ResultKind::Exit);
        assert_eq!(res.message, "Thank you for playing!");

        let res = world.parse(&Command::default(), &mut ScriptedConsole::default());
        assert_eq!(res.message, "That command is invalid. Type 'help' for a list of commands.");
    }

    #[test]
    fn test_run_line_dispatches_unknown_input() {
        let mut world = World::new(&WorldOptions::default());
        let mut console = ScriptedConsole::default();
        let invalid = "That command is invalid. Type 'help' for a list of commands.";

        for line in ["dance", "", "mn"] {
            let res = world.run_line(line, &mut console);
            assert!(res.is_failure());
            assert_eq!(res.message, invalid);
        }
        assert_eq!(world.rooms().len(), 1);
        assert_eq!(world.run_line("quit", &mut console).kind, ResultKind::Exit);
    }

    #[test]
    fn test_edit_toggle() {
        let mut world = World::new(&WorldOptions::default());
        assert!(run(&mut world, "mn").is_failure());
        assert_eq!(run(&mut world, "edit").message, "Edit mode enabled.");
        assert!(run(&mut world, "mn").is_success());
        assert_eq!(run(&mut world, "edit").message, "Edit mode disabled.");
    }

    #[test]
    fn test_item_commands_need_argument() {
        let mut world = edit_world();
        for line in ["take", "drop", "use", "setrequired"] {
            assert_eq!(run(&mut world, line).message, NEED_ITEM, "{}", line);
        }
    }

    #[test]
    fn test_take_by_name_and_id() {
        let mut world = edit_world();
        world.add_item("lamp", ["light"], "", 1, 1);
        world.add_item("rope", Vec::<String>::new(), "", 1, 1);

        assert_eq!(run(&mut world, "take light").message, "You picked up the lamp.");
        assert_eq!(run(&mut world, "take 2").message, "You picked up the rope.");
        assert_eq!(run(&mut world, "take 2").message, "There is no such item here.");
        assert_eq!(run(&mut world, "drop lamp").message, "You dropped your lamp.");
        assert_eq!(run(&mut world, "drop ghost").message, "You are not carrying that item.");
    }

    #[test]
    fn test_capacity_setters() {
        let mut world = edit_world();
        assert_eq!(run(&mut world, "maxweight 5").message, "Maximum weight updated.");
        assert_eq!(world.player().limits.max_weight, 5);
        assert_eq!(run(&mut world, "maxsize 0").message, "You must enter a positive size greater than 0.");
        assert_eq!(
            run(&mut world, "maxquantity").message,
            "Specify the number of items that can be held in inventory."
        );
        assert_eq!(run(&mut world, "maxquantity 3").message, "Maximum quantity updated.");
        assert_eq!(world.player().limits.max_quantity, 3);
    }

    #[test]
    fn test_required_and_target() {
        let mut world = edit_world();
        run(&mut world, "me switch");
        run(&mut world, "mw cond");
        world.add_item("lever", Vec::<String>::new(), "", 1, 1);
        run(&mut world, "e");

        assert_eq!(run(&mut world, "setrequired lever").message, "Required item set to lever (1).");
        assert_eq!(run(&mut world, "setrequired nothing").message, "That item does not exist.");
        assert_eq!(run(&mut world, "settarget 3").message, "Target room updated.");
        assert_eq!(run(&mut world, "settarget 99").message, "That room does not exist.");
        assert_eq!(run(&mut world, "settarget x").message, NEED_ROOM);
        assert_eq!(world.current_room().unwrap().target(), Some(RoomId(3)));

        assert_eq!(run(&mut world, "cleartar").message, "Cleared target room.");
        assert_eq!(
            run(&mut world, "clearreq").message,
            "Cleared the item required to operate this room."
        );
    }

    #[test]
    fn test_use_lever_in_switch_room() {
        let mut world = edit_world();
        run(&mut world, "me switch");
        run(&mut world, "mw cond");
        let lever = world.add_item("lever", Vec::<String>::new(), "", 1, 1);
        run(&mut world, "take lever");
        run(&mut world, "e");
        run(&mut world, "setrequired lever");
        run(&mut world, "settarget 3");

        let res = run(&mut world, "use lever");
        assert_eq!(res.message, "You hear a distant rumbling noise.");
        assert_eq!(world.rooms().get(RoomId(3)).unwrap().is_enabled(), Some(false));
        assert!(world.player().is_carrying(lever));
    }

    #[test]
    fn test_toggle_and_exit_flags() {
        let mut world = edit_world();
        assert_eq!(run(&mut world, "toggle").message, "This room type only has one state.");
        assert_eq!(run(&mut world, "tn").message, "This command only works on a condition room.");

        run(&mut world, "mn cond");
        run(&mut world, "n");
        assert_eq!(run(&mut world, "ts").message, "Enabled toggling of south exit.");
        assert_eq!(run(&mut world, "toggle").message, "Disabled exits that can be toggled.");
        assert_eq!(run(&mut world, "s").message, "You cannot go that way.");
        run(&mut world, "toggle");
        assert!(run(&mut world, "s").is_success());
    }

    #[test]
    fn test_delete_exit() {
        let mut world = edit_world();
        run(&mut world, "ms");
        assert_eq!(run(&mut world, "ds").message, "South exit removed.");
        assert_eq!(run(&mut world, "ds").message, "Exit not found.");
    }

    #[test]
    fn test_delete_commands_need_ids() {
        let mut world = edit_world();
        assert_eq!(run(&mut world, "delroom").message, NEED_ROOM);
        assert_eq!(
            run(&mut world, "delitem lamp").message,
            "This command requires an item ID as an argument."
        );
        assert_eq!(run(&mut world, "delroom 1").message, "You cannot delete the room you are in.");
    }

    #[test]
    fn test_listings() {
        let mut world = edit_world();
        run(&mut world, "mn switch");
        let res = run(&mut world, "listrooms");
        assert!(res.message.contains("  1 (basic)\n  2 (switch)"));
        assert_eq!(run(&mut world, "listitems").message, "The world does not have any items yet.");
        assert!(run(&mut world, "help").message.contains("timelimit"));
        assert!(run(&mut world, "inv").message.starts_with("You are not carrying anything"));
    }

    #[test]
    fn test_start_end_and_time_limit() {
        let mut world = edit_world();
        run(&mut world, "mn");
        run(&mut world, "n");
        assert_eq!(run(&mut world, "setend").message, "Updated goal to current room.");
        assert_eq!(run(&mut world, "setstart").message, "Updated starting point to current room.");
        assert_eq!(world.end(), Some(RoomId(2)));
        assert_eq!(world.start(), RoomId(2));

        assert_eq!(
            run(&mut world, "timelimit soon").message,
            "You must enter the time limit in seconds as an argument."
        );
        assert!(run(&mut world, "timelimit 90").is_success());
        assert_eq!(world.time_limit(), 90);
    }

    #[test]
    fn test_time_limit_out_of_range() {
        let mut world = edit_world();
        assert!(run(&mut world, "timelimit 90").is_success());

        let res = run(&mut world, "timelimit 99999999999999999999");
        assert!(res.is_failure());
        assert_eq!(res.message, "You must enter the time limit in seconds as an argument.");
        assert!(run(&mut world, "timelimit -5").is_failure());
        assert_eq!(world.time_limit(), 90);

        assert!(run(&mut world, "timelimit 2147483647").is_success());
        world.set_edit_mode(false);
        assert_eq!(world.time_warning(world.start_time() + 1), None);
    }

    #[test]
    fn test_description_argument() {
        let mut world = edit_world();
        run(&mut world, "desc A Quiet Room");
        // Input is lower-cased as a whole
        assert_eq!(world.current_room().unwrap().description(), "a quiet room\n");
    }

    #[test]
    fn test_create_through_dispatch() {
        let mut world = edit_world();
        let (cmd, _) = Command::parse("create", true);
        let mut console = ScriptedConsole::new(["gem", "", "A gem sparkles.", "1", "1"]);
        let res = world.parse(&cmd, &mut console);
        assert_eq!(res.message, "Created a new 'gem' item.");
        assert_eq!(world.rooms().get(RoomId(1)).unwrap().room_type(), RoomType::Basic);
        assert!(world.view().contains("A gem sparkles."));
    }

    #[test]
    fn test_save_to_unwritable_path() {
        let world = edit_world();
        let dir = std::env::temp_dir().join("textworld_no_such_dir").join("nested");
        let res = world.save(dir.join("game.dat").to_str().unwrap());
        assert!(res.is_failure());
        assert_eq!(res.message, "Cannot open file for writing.");
    }
}
