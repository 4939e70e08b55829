//! Countdown to the end room
//!
//! Times are Unix timestamps in seconds. Callers pass `now` in so the
//! narrative messages can be checked against a fixed clock.

use chrono::Utc;
use tracing::info;

use super::World;
use crate::consts::TIME_WARNING_MINUTES;

const KEEP_EXPLORING: &str = "Type 'exit' to quit or you can continue to explore.";

/// Current wall-clock time
pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}

impl World {
    /// Seconds left before the time limit runs out (negative once late)
    pub fn time_left(&self, now: i64) -> i64 {
        self.time_limit.saturating_add(self.start_time).saturating_sub(now)
    }

    /// Countdown warning shown before the room, never in edit mode
    pub fn time_warning(&self, now: i64) -> Option<String> {
        if self.edit_mode {
            return None;
        }
        let left = self.time_left(now);
        let minutes = left / 60;
        if minutes <= 0 {
            Some(format!("Sorry, you are out of time. {}", KEEP_EXPLORING))
        } else if minutes <= TIME_WARNING_MINUTES {
            Some(format!(
                "You only have {} minutes and {} seconds left to reach the goal!",
                minutes,
                left % 60
            ))
        } else {
            None
        }
    }

    /// Message for standing in the end room. The first arrival in time wins
    /// the game; later visits only get a reminder.
    pub fn goal_message(&mut self, now: i64) -> Option<String> {
        if self.end != Some(self.player.location()) {
            return None;
        }
        let left = self.time_left(now);
        let minutes = left / 60;

        if !self.won_game && minutes > 0 {
            self.won_game = true;
            info!(seconds_left = left, "end room reached");
            Some(format!(
                "Congratulations!\nYou reached the end with {} minutes and {} seconds left to spare!\n{}",
                minutes,
                left % 60,
                KEEP_EXPLORING
            ))
        } else if !self.won_game {
            Some(format!("You reached the end, but it was too late.\n{}", KEEP_EXPLORING))
        } else {
            Some(format!("This is the end of the game.\n{}", KEEP_EXPLORING))
        }
    }
}
