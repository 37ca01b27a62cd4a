mod amount;
mod catalog;
mod config;
mod constants;
mod game;
mod items;
mod leaderboard;
mod storage;

pub use amount::*;
pub use catalog::*;
pub use config::*;
pub use constants::*;
pub use game::*;
pub use items::*;
pub use leaderboard::*;
pub use storage::*;

#[cfg(test)]
mod tests;
