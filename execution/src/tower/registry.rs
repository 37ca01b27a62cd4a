//! Active sessions, at most one per channel.

use super::session::{Player, Session};
use std::collections::HashMap;
use thiserror::Error;
use towercash_types::GameConfig;
use tracing::{debug, info};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a game is already running in this channel")]
    SessionExists,
    #[error("games are not allowed in this channel")]
    ChannelNotAllowed,
    #[error("daily play limit reached")]
    DailyLimitReached,
}

#[derive(Default)]
pub struct Registry {
    sessions: HashMap<String, Session>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `player`. Fails if one is already running in the
    /// same channel.
    pub fn create(
        &mut self,
        player: Player,
        config: &GameConfig,
        event_mode: bool,
        seed: u64,
    ) -> Result<&mut Session, RegistryError> {
        if self.sessions.contains_key(&player.channel_id) {
            return Err(RegistryError::SessionExists);
        }
        let key = player.channel_id.clone();
        let id = self.next_id;
        self.next_id += 1;
        let session = Session::new(id, player, config, event_mode, seed);
        Ok(self.sessions.entry(key).or_insert(session))
    }

    pub fn get(&self, channel_id: &str) -> Option<&Session> {
        self.sessions.get(channel_id)
    }

    pub fn get_mut(&mut self, channel_id: &str) -> Option<&mut Session> {
        self.sessions.get_mut(channel_id)
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.sessions.contains_key(channel_id)
    }

    /// Whether the user has a game running in any channel but `except`.
    pub fn is_user_playing(&self, user_id: &str, except: Option<&str>) -> bool {
        self.sessions.values().any(|s| {
            s.player().user_id == user_id && except != Some(s.player().channel_id.as_str())
        })
    }

    /// Remove a channel's session, returning it.
    pub fn end(&mut self, channel_id: &str) -> Option<Session> {
        let session = self.sessions.remove(channel_id)?;
        debug!(id = session.id(), channel = channel_id, "session removed");
        Some(session)
    }

    /// Force-end and remove every session (shutdown, admin stop).
    pub fn stop_all(&mut self) -> Vec<Session> {
        let mut stopped: Vec<Session> = self.sessions.drain().map(|(_, s)| s).collect();
        for session in stopped.iter_mut() {
            if !session.is_ended() {
                // Already-ended sessions are returned as they are.
                let _ = session.force_end();
            }
        }
        stopped.sort_by_key(|s| s.id());
        info!(count = stopped.len(), "stopped all sessions");
        stopped
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::Phase;
    use towercash_types::EndReason;

    fn player(user: &str, channel: &str) -> Player {
        Player::new(user, user, channel, "guild")
    }

    #[test]
    fn test_one_session_per_channel() {
        let mut registry = Registry::new();
        let config = GameConfig::normal();
        let first = registry
            .create(player("u1", "c1"), &config, false, 1)
            .unwrap()
            .id();
        assert_eq!(
            registry
                .create(player("u1", "c1"), &config, false, 1)
                .err(),
            Some(RegistryError::SessionExists)
        );
        // Another player cannot join a busy channel either.
        assert_eq!(
            registry
                .create(player("u2", "c1"), &config, false, 1)
                .err(),
            Some(RegistryError::SessionExists)
        );
        let second = registry
            .create(player("u2", "c2"), &config, false, 1)
            .unwrap()
            .id();
        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("c1").unwrap().player().user_id, "u1");
        assert_eq!(registry.get("c2").unwrap().player().user_id, "u2");
        assert!(!registry.contains("c3"));
    }

    #[test]
    fn test_is_user_playing() {
        let mut registry = Registry::new();
        let config = GameConfig::normal();
        registry
            .create(player("u1", "c1"), &config, false, 1)
            .unwrap();
        assert!(registry.is_user_playing("u1", None));
        assert!(!registry.is_user_playing("u1", Some("c1")));
        assert!(registry.is_user_playing("u1", Some("c2")));
        assert!(!registry.is_user_playing("u2", None));
    }

    #[test]
    fn test_end_frees_the_slot() {
        let mut registry = Registry::new();
        let config = GameConfig::normal();
        registry
            .create(player("u1", "c1"), &config, false, 1)
            .unwrap();
        registry.get_mut("c1").unwrap().select_floor(3).unwrap();
        assert_eq!(registry.get("c1").unwrap().selected_floors(), &[3]);

        let ended = registry.end("c1").unwrap();
        assert_eq!(ended.player().user_id, "u1");
        assert!(registry.end("c1").is_none());
        assert!(registry
            .create(player("u2", "c1"), &config, false, 1)
            .is_ok());
    }

    #[test]
    fn test_stop_all() {
        let mut registry = Registry::new();
        let config = GameConfig::normal();
        for (user, channel) in [("u1", "c1"), ("u2", "c2"), ("u3", "c3")] {
            registry
                .create(player(user, channel), &config, false, 1)
                .unwrap();
        }
        registry.get_mut("c2").unwrap().force_end().unwrap();

        let stopped = registry.stop_all();
        assert!(registry.is_empty());
        assert_eq!(stopped.len(), 3);
        assert!(stopped
            .iter()
            .all(|s| s.phase() == Phase::Ended(EndReason::Abandoned)));
    }
}
