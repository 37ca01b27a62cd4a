use std::collections::BTreeMap;
use towercash_types::{GameRecord, Key, Settings, Value};
use tracing::{info, warn};

use crate::state::{load_daily_plays, load_guild, State, Status};
use crate::tower::{Player, Registry, RegistryError};

mod handlers;

/// A game admitted by [`Layer::start_game`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameStart {
    pub session_id: u64,
    pub event_mode: bool,
    /// `None` for admins, who are not limited.
    pub remaining_plays: Option<u32>,
}

/// Command flow over persistent state. Writes are buffered until
/// [`Layer::commit`].
pub struct Layer<'a, S: State> {
    state: &'a S,
    pending: BTreeMap<Key, Status>,

    settings: &'a Settings,
    day: u64,
}

impl<'a, S: State> Layer<'a, S> {
    pub fn new(state: &'a S, settings: &'a Settings, day: u64) -> Self {
        Self {
            state,
            pending: BTreeMap::new(),

            settings,
            day,
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    fn remove(&mut self, key: Key) {
        self.pending.insert(key, Status::Delete);
    }

    pub fn day(&self) -> u64 {
        self.day
    }

    /// Admit a player and create their session.
    ///
    /// Checks run in order: allowed channel, a game already running in the
    /// channel, then the daily limit (skipped for admins). The guild's event mode is read once and
    /// fixed for the whole game.
    pub async fn start_game(
        &mut self,
        registry: &mut Registry,
        player: Player,
        admin: bool,
        seed: u64,
    ) -> Result<GameStart, RegistryError> {
        let guild = load_guild(self, &player.guild_id).await;
        if !guild.allows(&player.channel_id) {
            return Err(RegistryError::ChannelNotAllowed);
        }
        if registry.contains(&player.channel_id) {
            return Err(RegistryError::SessionExists);
        }
        if !admin && !self.can_play_today(&player.guild_id, &player.user_id).await {
            return Err(RegistryError::DailyLimitReached);
        }

        let event_mode = guild.event_mode;
        let config = self.settings.game(event_mode);
        let (guild_id, user_id) = (player.guild_id.clone(), player.user_id.clone());
        let session_id = registry.create(player, config, event_mode, seed)?.id();

        let remaining_plays = if admin {
            None
        } else {
            self.increment_play_count(&guild_id, &user_id).await;
            Some(self.remaining_plays(&guild_id, &user_id).await)
        };
        info!(
            session_id,
            user = %user_id,
            guild = %guild_id,
            event_mode,
            admin,
            "game started"
        );
        Ok(GameStart {
            session_id,
            event_mode,
            remaining_plays,
        })
    }

    /// Remove a channel's session and record its result. Sessions still
    /// running are abandoned first.
    pub async fn finish_game(
        &mut self,
        registry: &mut Registry,
        channel_id: &str,
    ) -> Option<GameRecord> {
        let mut session = registry.end(channel_id)?;
        if !session.is_ended() {
            if let Err(e) = session.force_end() {
                warn!(id = session.id(), "failed to end session: {}", e);
            }
        }
        let summary = session.summary()?;
        let player = session.player();

        self.update_player_stats(
            &player.guild_id,
            &player.user_id,
            &player.username,
            summary.final_score,
            summary.won,
        )
        .await;
        let record = GameRecord {
            user_id: player.user_id.clone(),
            guild_id: player.guild_id.clone(),
            final_score: summary.final_score,
            floors_completed: summary.floors_completed,
            event_mode: session.event_mode(),
            ended_reason: summary.reason,
        };
        self.save_game_history(record.clone()).await;
        info!(
            id = session.id(),
            user = %record.user_id,
            score = record.final_score,
            reason = ?record.ended_reason,
            "game recorded"
        );
        Some(record)
    }

    /// Plays left today: the guild limit plus bonus plays, minus plays used.
    pub async fn remaining_plays(&self, guild_id: &str, user_id: &str) -> u32 {
        let limit = self.day_limit(guild_id).await;
        load_daily_plays(self, guild_id, user_id, self.day)
            .await
            .remaining(limit)
    }

    pub async fn can_play_today(&self, guild_id: &str, user_id: &str) -> bool {
        self.remaining_plays(guild_id, user_id).await > 0
    }

    async fn day_limit(&self, guild_id: &str) -> u32 {
        load_guild(self, guild_id)
            .await
            .day_limit
            .unwrap_or(self.settings.max_plays_per_day)
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

impl<'a, S: State> State for Layer<'a, S> {
    async fn get(&self, key: &Key) -> Option<Value> {
        match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.state.get(key).await,
        }
    }

    async fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    async fn delete(&mut self, key: &Key) {
        self.pending.insert(key.clone(), Status::Delete);
    }
}
