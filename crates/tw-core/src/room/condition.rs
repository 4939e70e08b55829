//! Condition rooms: exits that close while the room is disabled

use crate::action::Direction;
use crate::item::ItemId;

use super::id_or_none;

/// State carried by a condition room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionState {
    pub(crate) alt_description: String,
    pub(crate) enabled: bool,
    pub(crate) required: Option<ItemId>,
    /// Exits (by direction index) that close while disabled
    pub(crate) toggled: [bool; 4],
}

impl Default for ConditionState {
    fn default() -> Self {
        Self {
            alt_description: "The description when toggled exits are disabled.\n".to_string(),
            enabled: true,
            required: None,
            toggled: [false; 4],
        }
    }
}

impl ConditionState {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn required(&self) -> Option<ItemId> {
        self.required
    }

    /// Whether the exit in `dir` is toggle-controlled
    pub fn is_toggle_controlled(&self, dir: Direction) -> bool {
        self.toggled[dir.index()]
    }

    /// Whether the exit in `dir` is currently closed
    pub fn blocks(&self, dir: Direction) -> bool {
        !self.enabled && self.is_toggle_controlled(dir)
    }

    pub(crate) fn set_toggle_controlled(&mut self, dir: Direction, controlled: bool) {
        self.toggled[dir.index()] = controlled;
    }

    pub(crate) fn toggle(&mut self) -> &'static str {
        self.enabled = !self.enabled;
        if self.enabled {
            "Enabled all exits."
        } else {
            "Disabled exits that can be toggled."
        }
    }

    pub(crate) fn toggle_exit(&mut self, dir: Direction) -> String {
        let slot = &mut self.toggled[dir.index()];
        *slot = !*slot;
        let verb = if *slot { "Enabled" } else { "Disabled" };
        format!("{} toggling of {} exit.", verb, dir)
    }

    pub(crate) fn edit_summary(&self) -> String {
        let mut out = format!(
            "Toggled Exits Are {}\nToggled Exits: ",
            if self.enabled { "Accessible" } else { "Blocked" }
        );
        for dir in Direction::ALL {
            if self.is_toggle_controlled(dir) {
                out.push_str(dir.title());
                out.push(' ');
            }
        }
        out.push_str(&format!("\nRequired Item ID: {}\n", id_or_none(self.required)));
        out
    }
}
