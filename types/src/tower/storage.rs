use super::{GameRecord, Leaderboard, PlayerStats};
use serde::{Deserialize, Serialize};

/// Per-guild settings.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuildSettings {
    /// Overrides the configured daily limit.
    pub day_limit: Option<u32>,
    pub event_mode: bool,
    /// Channels games may start in. Empty means every channel.
    pub allowed_channels: Vec<String>,
}

impl GuildSettings {
    pub fn allows(&self, channel_id: &str) -> bool {
        self.allowed_channels.is_empty() || self.allowed_channels.iter().any(|c| c == channel_id)
    }
}

/// Plays used and granted on one day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyPlays {
    pub play_count: u32,
    pub bonus_plays: u32,
}

impl DailyPlays {
    pub fn remaining(&self, limit: u32) -> u32 {
        limit
            .saturating_add(self.bonus_plays)
            .saturating_sub(self.play_count)
    }
}

/// Snapshot of a guild taken before it is reset.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuildArchive {
    pub guild_id: String,
    pub day: u64,
    /// Every player, best first.
    pub players: Vec<PlayerStats>,
    pub games: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    Guild(String),
    Player { guild_id: String, user_id: String },
    DailyPlays { guild_id: String, user_id: String, day: u64 },
    /// Users with any stored record in a guild.
    Roster(String),
    Leaderboard(String),
    History(String),
    Archive { guild_id: String, day: u64 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Guild(GuildSettings),
    Player(PlayerStats),
    DailyPlays(DailyPlays),
    Roster(Vec<String>),
    Leaderboard(Leaderboard),
    History(Vec<GameRecord>),
    Archive(GuildArchive),
}
