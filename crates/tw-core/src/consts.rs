//! Engine-wide defaults

/// File the world is saved to and loaded from when no path is given
pub const DEFAULT_SAVE_FILE: &str = "game.dat";

/// Seconds the player has to reach the end room
pub const DEFAULT_TIME_LIMIT: i64 = 600;

/// Longest time limit accepted, in seconds
pub const MAX_TIME_LIMIT: i64 = i32::MAX as i64;

/// Heaviest total load the player can carry
pub const DEFAULT_MAX_WEIGHT: u32 = 100;

/// Largest single item that fits in the player's bag
pub const DEFAULT_MAX_SIZE: u32 = 10;

/// Number of items the player's bag holds
pub const DEFAULT_MAX_QUANTITY: u32 = 5;

/// Remaining minutes at which the countdown warning starts
pub const TIME_WARNING_MINUTES: i64 = 3;
