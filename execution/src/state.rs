use std::{
    collections::HashMap,
    future::Future,
    time::{SystemTime, UNIX_EPOCH},
};
use towercash_types::{
    DailyPlays, GameRecord, GuildSettings, Key, Leaderboard, PlayerStats, Value,
};
use tracing::warn;

const SECONDS_PER_DAY: u64 = 86_400;

pub trait State {
    fn get(&self, key: &Key) -> impl Future<Output = Option<Value>>;
    fn insert(&mut self, key: Key, value: Value) -> impl Future<Output = ()>;
    fn delete(&mut self, key: &Key) -> impl Future<Output = ()>;

    fn apply(&mut self, changes: Vec<(Key, Status)>) -> impl Future<Output = ()> {
        async {
            for (key, status) in changes {
                match status {
                    Status::Update(value) => self.insert(key, value).await,
                    Status::Delete => self.delete(&key).await,
                }
            }
        }
    }
}

#[derive(Default)]
pub struct Memory {
    state: HashMap<Key, Value>,
}

impl Memory {
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl State for Memory {
    async fn get(&self, key: &Key) -> Option<Value> {
        self.state.get(key).cloned()
    }

    async fn insert(&mut self, key: Key, value: Value) {
        self.state.insert(key, value);
    }

    async fn delete(&mut self, key: &Key) {
        self.state.remove(key);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Update(Value),
    Delete,
}

/// Days since the Unix epoch (UTC).
pub fn current_day() -> u64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() / SECONDS_PER_DAY,
        Err(e) => {
            warn!("system clock is before the epoch: {:?}", e);
            0
        }
    }
}

pub(crate) async fn load_guild<S: State>(state: &S, guild_id: &str) -> GuildSettings {
    match state.get(&Key::Guild(guild_id.to_string())).await {
        Some(Value::Guild(settings)) => settings,
        _ => GuildSettings::default(),
    }
}

pub(crate) async fn load_player<S: State>(
    state: &S,
    guild_id: &str,
    user_id: &str,
) -> Option<PlayerStats> {
    match state
        .get(&Key::Player {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
        })
        .await
    {
        Some(Value::Player(stats)) => Some(stats),
        _ => None,
    }
}

pub(crate) async fn load_daily_plays<S: State>(
    state: &S,
    guild_id: &str,
    user_id: &str,
    day: u64,
) -> DailyPlays {
    match state
        .get(&Key::DailyPlays {
            guild_id: guild_id.to_string(),
            user_id: user_id.to_string(),
            day,
        })
        .await
    {
        Some(Value::DailyPlays(plays)) => plays,
        _ => DailyPlays::default(),
    }
}

pub(crate) async fn load_roster<S: State>(state: &S, guild_id: &str) -> Vec<String> {
    match state.get(&Key::Roster(guild_id.to_string())).await {
        Some(Value::Roster(users)) => users,
        _ => Vec::new(),
    }
}

pub(crate) async fn load_leaderboard<S: State>(state: &S, guild_id: &str) -> Leaderboard {
    match state.get(&Key::Leaderboard(guild_id.to_string())).await {
        Some(Value::Leaderboard(board)) => board,
        _ => Leaderboard::default(),
    }
}

pub(crate) async fn load_history<S: State>(state: &S, guild_id: &str) -> Vec<GameRecord> {
    match state.get(&Key::History(guild_id.to_string())).await {
        Some(Value::History(records)) => records,
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_memory_apply() {
        block_on(async {
            let mut state = Memory::default();
            let guild = Key::Guild("g1".to_string());
            state
                .insert(
                    Key::Roster("g1".to_string()),
                    Value::Roster(vec!["u1".to_string()]),
                )
                .await;
            state
                .apply(vec![
                    (
                        guild.clone(),
                        Status::Update(Value::Guild(GuildSettings {
                            event_mode: true,
                            ..Default::default()
                        })),
                    ),
                    (Key::Roster("g1".to_string()), Status::Delete),
                ])
                .await;
            assert_eq!(state.len(), 1);
            assert!(load_guild(&state, "g1").await.event_mode);
            assert!(load_roster(&state, "g1").await.is_empty());
        });
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        block_on(async {
            let state = Memory::default();
            assert_eq!(load_guild(&state, "g").await, GuildSettings::default());
            assert!(load_player(&state, "g", "u").await.is_none());
            assert_eq!(load_daily_plays(&state, "g", "u", 3).await.play_count, 0);
            assert!(load_leaderboard(&state, "g").await.entries.is_empty());
            assert!(load_history(&state, "g").await.is_empty());
        });
    }
}
