use super::super::*;
use crate::state::{load_history, load_leaderboard, load_player, load_roster};
use towercash_types::{DailyPlays, LeaderboardEntry, PlayerStats};

impl<'a, S: State> Layer<'a, S> {
    // === Plays ===

    /// Track a user in the guild roster so resets can find their records.
    async fn enroll(&mut self, guild_id: &str, user_id: &str) {
        let mut roster = load_roster(self, guild_id).await;
        if roster.iter().any(|u| u == user_id) {
            return;
        }
        roster.push(user_id.to_string());
        self.insert(Key::Roster(guild_id.to_string()), Value::Roster(roster));
    }

    async fn update_daily_plays(
        &mut self,
        guild_id: &str,
        user_id: &str,
        f: impl FnOnce(&mut DailyPlays),
    ) {
        let mut plays = load_daily_plays(self, guild_id, user_id, self.day).await;
        f(&mut plays);
        self.insert(
            Key::DailyPlays {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
                day: self.day,
            },
            Value::DailyPlays(plays),
        );
        self.enroll(guild_id, user_id).await;
    }

    pub async fn increment_play_count(&mut self, guild_id: &str, user_id: &str) {
        self.update_daily_plays(guild_id, user_id, |plays| {
            plays.play_count = plays.play_count.saturating_add(1)
        })
        .await;
    }

    /// Grant extra plays for today.
    pub async fn add_bonus_plays(&mut self, guild_id: &str, user_id: &str, amount: u32) {
        self.update_daily_plays(guild_id, user_id, |plays| {
            plays.bonus_plays = plays.bonus_plays.saturating_add(amount)
        })
        .await;
        info!(guild = guild_id, user = user_id, amount, "bonus plays granted");
    }

    // === Stats & Leaderboard ===

    pub async fn player_stats(&self, guild_id: &str, user_id: &str) -> Option<PlayerStats> {
        load_player(self, guild_id, user_id).await
    }

    /// Fold a finished game into the player's record and the guild
    /// leaderboard.
    pub async fn update_player_stats(
        &mut self,
        guild_id: &str,
        user_id: &str,
        username: &str,
        score: u64,
        won: bool,
    ) -> PlayerStats {
        let mut stats = load_player(self, guild_id, user_id)
            .await
            .unwrap_or_else(|| PlayerStats::new(user_id, username));
        stats.record(username, score, won);
        self.insert(
            Key::Player {
                guild_id: guild_id.to_string(),
                user_id: user_id.to_string(),
            },
            Value::Player(stats.clone()),
        );
        self.enroll(guild_id, user_id).await;

        let mut leaderboard = load_leaderboard(self, guild_id).await;
        leaderboard.update(&stats);
        self.insert(
            Key::Leaderboard(guild_id.to_string()),
            Value::Leaderboard(leaderboard),
        );
        stats
    }

    pub async fn leaderboard(&self, guild_id: &str, limit: usize) -> Vec<LeaderboardEntry> {
        load_leaderboard(self, guild_id).await.top(limit).to_vec()
    }

    // === History ===

    pub async fn save_game_history(&mut self, record: GameRecord) {
        let guild_id = record.guild_id.clone();
        let mut history = load_history(self, &guild_id).await;
        history.push(record);
        self.insert(Key::History(guild_id), Value::History(history));
    }

    /// A user's latest games, newest first.
    pub async fn recent_plays(&self, guild_id: &str, user_id: &str, limit: usize) -> Vec<GameRecord> {
        load_history(self, guild_id)
            .await
            .into_iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .collect()
    }

    /// A user's best games, highest score first.
    pub async fn top_plays(&self, guild_id: &str, user_id: &str, limit: usize) -> Vec<GameRecord> {
        let mut plays: Vec<GameRecord> = load_history(self, guild_id)
            .await
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        plays.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        plays.truncate(limit);
        plays
    }
}
