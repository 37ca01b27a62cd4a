use super::super::*;
use crate::state::{load_history, load_player, load_roster};
use towercash_types::{GuildArchive, GuildSettings, PlayerStats};

impl<'a, S: State> Layer<'a, S> {
    // === Guild Settings ===

    async fn update_guild(&mut self, guild_id: &str, f: impl FnOnce(&mut GuildSettings)) {
        let mut guild = load_guild(self, guild_id).await;
        f(&mut guild);
        self.insert(Key::Guild(guild_id.to_string()), Value::Guild(guild));
    }

    pub async fn is_channel_allowed(&self, guild_id: &str, channel_id: &str) -> bool {
        load_guild(self, guild_id).await.allows(channel_id)
    }

    pub async fn add_allowed_channel(&mut self, guild_id: &str, channel_id: &str) {
        self.update_guild(guild_id, |guild| {
            if !guild.allowed_channels.iter().any(|c| c == channel_id) {
                guild.allowed_channels.push(channel_id.to_string());
            }
        })
        .await;
    }

    pub async fn remove_allowed_channel(&mut self, guild_id: &str, channel_id: &str) {
        self.update_guild(guild_id, |guild| {
            guild.allowed_channels.retain(|c| c != channel_id)
        })
        .await;
    }

    pub async fn event_mode(&self, guild_id: &str) -> bool {
        load_guild(self, guild_id).await.event_mode
    }

    /// Takes effect for games started afterwards.
    pub async fn set_event_mode(&mut self, guild_id: &str, enabled: bool) {
        self.update_guild(guild_id, |guild| guild.event_mode = enabled)
            .await;
        info!(guild = guild_id, enabled, "event mode changed");
    }

    /// Override the daily play limit for a guild (`None` restores the
    /// configured default).
    pub async fn set_day_limit(&mut self, guild_id: &str, limit: Option<u32>) {
        self.update_guild(guild_id, |guild| guild.day_limit = limit)
            .await;
    }

    // === Reset & Archive ===

    /// Clear player stats, today's plays, the leaderboard and the history of
    /// a guild. Guild settings are kept.
    pub async fn reset_guild(&mut self, guild_id: &str) {
        let roster = load_roster(self, guild_id).await;
        for user_id in &roster {
            self.remove(Key::Player {
                guild_id: guild_id.to_string(),
                user_id: user_id.clone(),
            });
            self.remove(Key::DailyPlays {
                guild_id: guild_id.to_string(),
                user_id: user_id.clone(),
                day: self.day,
            });
        }
        self.remove(Key::Roster(guild_id.to_string()));
        self.remove(Key::Leaderboard(guild_id.to_string()));
        self.remove(Key::History(guild_id.to_string()));
        info!(guild = guild_id, players = roster.len(), "guild reset");
    }

    /// Store a snapshot of every player, best first, then reset the guild.
    pub async fn archive_guild(&mut self, guild_id: &str) -> GuildArchive {
        let roster = load_roster(self, guild_id).await;
        let mut players: Vec<PlayerStats> = Vec::with_capacity(roster.len());
        for user_id in &roster {
            if let Some(stats) = load_player(self, guild_id, user_id).await {
                players.push(stats);
            }
        }
        players.sort_by(|a, b| {
            (b.highest_score, b.total_wins).cmp(&(a.highest_score, a.total_wins))
        });
        let archive = GuildArchive {
            guild_id: guild_id.to_string(),
            day: self.day,
            players,
            games: load_history(self, guild_id).await.len(),
        };
        self.insert(
            Key::Archive {
                guild_id: guild_id.to_string(),
                day: self.day,
            },
            Value::Archive(archive.clone()),
        );
        self.reset_guild(guild_id).await;
        archive
    }
}
