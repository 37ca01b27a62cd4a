use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use towercash_execution::{
    mocks::autoplay,
    tower::{Player, Registry, RegistryError},
    Layer, Memory, State,
};
use towercash_types::{GameRecord, LeaderboardEntry, Settings, LEADERBOARD_SIZE};
use tracing::{debug, info};

pub const GUILD: &str = "simulated-guild";
pub const CHANNEL: &str = "simulated-channel";

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("game could not start: {0}")]
    Start(#[from] RegistryError),
    #[error("session {0} vanished before it was recorded")]
    Lost(String),
    #[error("continue chance must be within 0..=1, got {0}")]
    InvalidChance(f64),
}

/// Aggregate results of a batch of games.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub games: u32,
    pub wins: u32,
    pub days: u64,
    pub total_score: u64,
    pub best_score: u64,
    pub floors_completed: u64,
    pub end_reasons: BTreeMap<String, u32>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Report {
    fn record(&mut self, record: &GameRecord) {
        self.games += 1;
        if record.won() {
            self.wins += 1;
        }
        self.total_score = self.total_score.saturating_add(record.final_score);
        self.best_score = self.best_score.max(record.final_score);
        self.floors_completed += record.floors_completed as u64;
        *self
            .end_reasons
            .entry(format!("{:?}", record.ended_reason))
            .or_insert(0) += 1;
    }

    pub fn average_score(&self) -> u64 {
        match self.games {
            0 => 0,
            games => self.total_score / games as u64,
        }
    }
}

/// Plays games end to end through the same command flow a bot would use,
/// against in-memory state.
pub struct Simulator {
    state: Memory,
    registry: Registry,
    settings: Settings,
    rng: ChaCha20Rng,
    day: u64,
    continue_chance: f64,
}

impl Simulator {
    pub fn new(
        settings: Settings,
        seed: u64,
        continue_chance: f64,
    ) -> Result<Self, SimulatorError> {
        if !(0.0..=1.0).contains(&continue_chance) {
            return Err(SimulatorError::InvalidChance(continue_chance));
        }
        Ok(Self {
            state: Memory::default(),
            registry: Registry::new(),
            settings,
            rng: ChaCha20Rng::seed_from_u64(seed),
            day: 0,
            continue_chance,
        })
    }

    pub async fn set_event_mode(&mut self, enabled: bool) {
        let mut layer = Layer::new(&self.state, &self.settings, self.day);
        layer.set_event_mode(GUILD, enabled).await;
        let changes = layer.commit();
        self.state.apply(changes).await;
    }

    /// Play one game for `user_id`. A user out of plays waits for the next
    /// day.
    pub async fn play(&mut self, user_id: &str) -> Result<GameRecord, SimulatorError> {
        let player = Player::new(user_id, user_id, CHANNEL, GUILD);
        let seed = self.rng.gen();
        let mut layer = Layer::new(&self.state, &self.settings, self.day);
        let start = match layer
            .start_game(&mut self.registry, player.clone(), false, seed)
            .await
        {
            Err(RegistryError::DailyLimitReached) => {
                self.day += 1;
                debug!(day = self.day, "next day");
                layer = Layer::new(&self.state, &self.settings, self.day);
                layer
                    .start_game(&mut self.registry, player, false, seed)
                    .await?
            }
            result => result?,
        };

        let session = self
            .registry
            .get_mut(CHANNEL)
            .ok_or_else(|| SimulatorError::Lost(user_id.to_string()))?;
        let summary = autoplay(session, &mut self.rng, self.continue_chance);
        debug!(
            session = start.session_id,
            score = summary.final_score,
            reason = ?summary.reason,
            "game played"
        );

        let record = layer
            .finish_game(&mut self.registry, CHANNEL)
            .await
            .ok_or_else(|| SimulatorError::Lost(user_id.to_string()))?;
        let changes = layer.commit();
        self.state.apply(changes).await;
        Ok(record)
    }

    /// Play `games` games spread over `players` users.
    pub async fn run(&mut self, games: u32, players: u32) -> Result<Report, SimulatorError> {
        let mut report = Report::default();
        for i in 0..games {
            let user_id = format!("player-{}", i % players.max(1));
            let record = self.play(&user_id).await?;
            report.record(&record);
        }
        report.days = self.day + 1;

        let layer = Layer::new(&self.state, &self.settings, self.day);
        report.leaderboard = layer.leaderboard(GUILD, LEADERBOARD_SIZE).await;
        info!(
            games = report.games,
            wins = report.wins,
            average = report.average_score(),
            "simulation finished"
        );
        Ok(report)
    }
}
