use super::{EndReason, LEADERBOARD_SIZE, MAX_NAME_LENGTH};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Lifetime record of one player in one guild.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub user_id: String,
    pub username: String,
    pub total_wins: u32,
    pub highest_score: u64,
    pub total_games: u32,
}

impl PlayerStats {
    pub fn new(user_id: &str, username: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: truncate_name(username),
            ..Default::default()
        }
    }

    /// Fold a finished game into the record.
    pub fn record(&mut self, username: &str, score: u64, won: bool) {
        self.username = truncate_name(username);
        self.highest_score = self.highest_score.max(score);
        self.total_games = self.total_games.saturating_add(1);
        if won {
            self.total_wins = self.total_wins.saturating_add(1);
        }
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(MAX_NAME_LENGTH).collect()
}

/// One finished game, as written to the history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub user_id: String,
    pub guild_id: String,
    pub final_score: u64,
    pub floors_completed: u32,
    pub event_mode: bool,
    pub ended_reason: EndReason,
}

impl GameRecord {
    pub fn won(&self) -> bool {
        self.ended_reason.is_win()
    }
}

/// Leaderboard entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub highest_score: u64,
    pub total_wins: u32,
    pub rank: u32,
}

impl LeaderboardEntry {
    /// Best first: highest score, then most wins.
    fn order(&self, highest_score: u64, total_wins: u32) -> Ordering {
        (highest_score, total_wins).cmp(&(self.highest_score, self.total_wins))
    }
}

/// Guild leaderboard, best player first.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn update(&mut self, stats: &PlayerStats) {
        // Find and remove existing entry for this player
        if let Some(idx) = self
            .entries
            .iter()
            .position(|e| e.user_id == stats.user_id)
        {
            self.entries.remove(idx);
        }

        // Early exit: a full board only admits players beating the last entry
        if self.entries.len() >= LEADERBOARD_SIZE {
            if let Some(last) = self.entries.last() {
                if last.order(stats.highest_score, stats.total_wins) != Ordering::Greater {
                    return;
                }
            }
        }

        let insert_pos = self
            .entries
            .binary_search_by(|e| e.order(stats.highest_score, stats.total_wins))
            .unwrap_or_else(|pos| pos);

        self.entries.insert(
            insert_pos,
            LeaderboardEntry {
                user_id: stats.user_id.clone(),
                username: stats.username.clone(),
                highest_score: stats.highest_score,
                total_wins: stats.total_wins,
                rank: 0,
            },
        );

        self.entries.truncate(LEADERBOARD_SIZE);
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.rank = (i + 1) as u32;
        }
    }

    /// The best `limit` entries.
    pub fn top(&self, limit: usize) -> &[LeaderboardEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }
}
