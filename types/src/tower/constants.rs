/// Floors in a normal game (6 + 5 + 4 + 3 + 2 + 1).
pub const NORMAL_FLOORS: usize = 21;

/// Floors in an event-mode game (7 + 6 + 5 + 4 + 3 + 2 + 1).
pub const EVENT_FLOORS: usize = 28;

/// Floors the player selects in each round of a normal game.
pub const NORMAL_ROUNDS: [usize; 6] = [6, 5, 4, 3, 2, 1];

/// Floors the player selects in each round of an event-mode game.
pub const EVENT_ROUNDS: [usize; 7] = [7, 6, 5, 4, 3, 2, 1];

/// Default number of games a player may start per guild per day.
pub const MAX_PLAYS_PER_DAY: u32 = 2;

/// Number of entries kept on a guild leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

/// Bound (inclusive, both signs) of the "Random ± %" roll.
pub const RANDOM_PERCENT_LIMIT: i64 = 150;

/// Exclusive upper bound of the boost multiplier, in hundredths (3.00x).
pub const BOOST_MULTIPLIER_LIMIT: u32 = 300;

/// Target the Scale item moves the total halfway towards.
pub const BALANCE_TARGET: u64 = 100_000;

/// Bound of the Coin Flip item swing, in either direction.
pub const COIN_FLIP_SWING: u64 = 50_000;

/// Maximum username length kept on player records.
pub const MAX_NAME_LENGTH: usize = 32;
