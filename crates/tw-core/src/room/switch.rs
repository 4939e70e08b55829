//! Switch rooms: using the right item flips this room and a target room

use crate::item::ItemId;
use crate::room::RoomId;

use super::id_or_none;

/// State carried by a switch room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchState {
    pub(crate) alt_description: String,
    pub(crate) enabled: bool,
    pub(crate) required: Option<ItemId>,
    pub(crate) target: Option<RoomId>,
}

impl Default for SwitchState {
    fn default() -> Self {
        Self {
            alt_description: "The description when the switch is flipped.\n".to_string(),
            enabled: false,
            required: None,
            target: None,
        }
    }
}

impl SwitchState {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn required(&self) -> Option<ItemId> {
        self.required
    }

    pub fn target(&self) -> Option<RoomId> {
        self.target
    }

    pub(crate) fn toggle(&mut self) -> &'static str {
        self.enabled = !self.enabled;
        if self.enabled {
            "Turned the switch on."
        } else {
            "Turned the switch off."
        }
    }

    pub(crate) fn edit_summary(&self) -> String {
        format!(
            "Switch Is {}\nTarget Room ID: {}\nRequired Item ID: {}\n",
            if self.enabled { "On" } else { "Off" },
            id_or_none(self.target),
            id_or_none(self.required)
        )
    }
}
