//! Tower of Cash game execution module.
//!
//! This module contains the floor/round engine and every minigame:
//! - The Vault
//! - Operator Offer
//! - Mega Grid
//! - ∞%
//! - Hideout Breakthrough
//! - Babushka
//! - Boiling Point
//! - Operator Roshambo
//! - Mystery Box

pub mod babushka;
pub mod boiling_point;
pub mod effects;
pub mod hideout;
pub mod infinity;
pub mod ledger;
pub mod mega_grid;
pub mod money;
pub mod mystery_box;
pub mod operator_offer;
pub mod pool;
pub mod registry;
pub mod roshambo;
pub mod session;
pub mod vault;

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use serde::Serialize;
use thiserror::Error;
use towercash_types::{EventAction, Side};

pub use registry::{Registry, RegistryError};
pub use session::{
    AdvanceOutcome, FloorOutcome, FloorSignal, GameSummary, HistoryEntry, NextFloor, Phase,
    Player, Session, SessionSnapshot,
};

/// Deterministic random number generator for one session.
///
/// Uses SHA256 hash chains keyed by the session seed, the session id and a
/// per-session move counter, so every game can be replayed from its seed.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a seed, session ID, and move number.
    pub fn new(seed: u64, session_id: u64, move_number: u32) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&seed.to_be_bytes());
        hasher.update(&session_id.to_be_bytes());
        hasher.update(&move_number.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    /// Get the next random byte.
    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            // Rehash to get more bytes
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random u64 value.
    pub fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        for byte in bytes.iter_mut() {
            *byte = self.next_byte();
        }
        u64::from_be_bytes(bytes)
    }

    /// Get a random f64 value in range [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u64) -> u64 {
        if max == 0 {
            return 0;
        }
        // Simple rejection sampling for unbiased distribution
        let limit = u64::MAX - (u64::MAX % max);
        loop {
            let value = self.next_u64();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Get a random value in range [min, max]. Swapped bounds are tolerated.
    pub fn range_inclusive(&mut self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        match (hi - lo).checked_add(1) {
            Some(span) => lo + self.next_bounded(span),
            None => self.next_u64(),
        }
    }

    /// Get a random signed value in range [min, max].
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = hi.abs_diff(lo);
        lo.wrapping_add(self.range_inclusive(0, span) as i64)
    }

    /// Returns true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick a uniformly random side.
    pub fn side(&mut self) -> Side {
        if self.next_bounded(2) == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Shuffle a slice in place using Fisher-Yates.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_bounded((i + 1) as u64) as usize;
            slice.swap(i, j);
        }
    }
}

/// Error during game execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Floor selection is not complete.
    #[error("floor selection is not complete")]
    NotReady,
    /// Operation is not valid in the current phase.
    #[error("operation not valid while {0:?}")]
    InvalidPhase(Phase),
    /// Floor operations are locked while a minigame runs.
    #[error("a minigame is in progress")]
    MinigameActive,
    /// No minigame of the requested kind is running.
    #[error("no matching minigame is in progress")]
    MinigameInactive,
    /// The move was rejected by the running minigame.
    #[error("invalid move")]
    InvalidMove,
    /// An active effect forbids banking or cashing out.
    #[error("banking is locked by an active effect")]
    BankingLocked,
    /// The game has already ended.
    #[error("game already complete")]
    GameAlreadyComplete,
}

/// Direction of a Boiling Point step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Plus,
    Minus,
}

/// A player input to whichever minigame is running.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MinigameMove {
    /// Vault: a six-digit code with unique digits.
    Guess(String),
    /// Operator Offer.
    Accept,
    /// Operator Offer.
    Decline,
    /// Mega Grid cell, Hideout position or Mystery Box index.
    Pick(usize),
    /// ∞% side.
    Choose(Side),
    /// Babushka: open a doll and reveal its first layer.
    OpenDoll(usize),
    /// Babushka: reveal the next layer of the open doll.
    Reveal,
    /// Babushka: bank the current layer.
    Bank,
    /// Boiling Point step.
    Step(Sign),
    /// Boiling Point: swap the upcoming value for a reserve.
    Change,
    /// Operator Roshambo throw.
    Throw(roshambo::Hand),
    /// Leave the minigame with whatever it has banked (Mega Grid, ∞%,
    /// Babushka walk-away).
    CashOut,
}

impl MinigameMove {
    /// Moves that pay out banked winnings early.
    pub fn is_banking(&self) -> bool {
        matches!(self, Self::Bank | Self::CashOut)
    }
}

/// The minigame slot of a session.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Minigame {
    Vault(vault::Vault),
    OperatorOffer(operator_offer::OperatorOffer),
    MegaGrid(mega_grid::MegaGrid),
    InfinityPercent(infinity::Infinity),
    HideoutBreakthrough(hideout::Hideout),
    Babushka(babushka::Babushka),
    BoilingPoint(boiling_point::BoilingPoint),
    OperatorRoshambo(roshambo::Roshambo),
    MysteryBox(mystery_box::MysteryBox),
}

impl Minigame {
    pub fn action(&self) -> EventAction {
        match self {
            Self::Vault(_) => EventAction::Vault,
            Self::OperatorOffer(_) => EventAction::OperatorOffer,
            Self::MegaGrid(_) => EventAction::MegaGrid,
            Self::InfinityPercent(_) => EventAction::InfinityPercent,
            Self::HideoutBreakthrough(_) => EventAction::HideoutBreakthrough,
            Self::Babushka(_) => EventAction::Babushka,
            Self::BoilingPoint(_) => EventAction::BoilingPoint,
            Self::OperatorRoshambo(_) => EventAction::OperatorRoshambo,
            Self::MysteryBox(_) => EventAction::MysteryBox,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Vault(g) => g.is_active(),
            Self::OperatorOffer(g) => g.is_active(),
            Self::MegaGrid(g) => g.is_active(),
            Self::InfinityPercent(g) => g.is_active(),
            Self::HideoutBreakthrough(g) => g.is_active(),
            Self::Babushka(g) => g.is_active(),
            Self::BoilingPoint(g) => g.is_active(),
            Self::OperatorRoshambo(g) => g.is_active(),
            Self::MysteryBox(g) => g.is_active(),
        }
    }
}

/// Result of one minigame move.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum MinigameOutcome {
    Vault(vault::VaultGuess),
    OperatorOffer(operator_offer::OfferOutcome),
    MegaGrid(mega_grid::GridOutcome),
    InfinityPercent(infinity::InfinityOutcome),
    HideoutBreakthrough(hideout::HideoutPick),
    Babushka(babushka::BabushkaOutcome),
    BoilingPoint(boiling_point::BoilingOutcome),
    OperatorRoshambo(roshambo::RoshamboRound),
    MysteryBox(mystery_box::BoxOpened),
}

/// A minigame move as seen by the session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MinigameResult {
    pub outcome: MinigameOutcome,
    pub money_before: u64,
    pub money_after: u64,
    /// The minigame is over and floor play may resume.
    pub finished: bool,
}
