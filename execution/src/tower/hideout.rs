//! Hideout Breakthrough.
//!
//! Twelve doors hide the numbers 1 to 12. Each door opened must beat the last
//! one; every success banks a growing step reward. Finding 12 wins outright,
//! and finding it once six or more successes are in a row pays the jackpot
//! instead.

use super::GameRng;
use serde::Serialize;

pub const POSITIONS: usize = 12;

/// Reward banked by the n-th success; later successes repeat the last step.
pub const STEP_REWARDS: [u64; 6] = [20_000, 30_000, 50_000, 75_000, 100_000, 150_000];

/// Paid instead of the accumulated reward when 12 is the sixth or later
/// success.
pub const JACKPOT: u64 = 1_000_000;

const JACKPOT_STREAK: u8 = 6;

pub fn step_reward(success: u8) -> u64 {
    let idx = (success.max(1) as usize - 1).min(STEP_REWARDS.len() - 1);
    STEP_REWARDS[idx]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HideoutPick {
    pub position: usize,
    pub value: u8,
    pub success: bool,
    pub failed: bool,
    pub jackpot: bool,
    pub accumulated: u64,
    /// Amount added to the total when the hideout closed.
    pub payout: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Hideout {
    #[serde(skip)]
    values: [u8; POSITIONS],
    revealed: [bool; POSITIONS],
    last: Option<u8>,
    successes: u8,
    accumulated: u64,
    active: bool,
}

impl Hideout {
    pub fn start(rng: &mut GameRng) -> Self {
        let mut values = [0u8; POSITIONS];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as u8 + 1;
        }
        rng.shuffle(&mut values);
        Self::with_values(values)
    }

    fn with_values(values: [u8; POSITIONS]) -> Self {
        Self {
            values,
            revealed: [false; POSITIONS],
            last: None,
            successes: 0,
            accumulated: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    /// Value to beat, if any door has been opened.
    pub fn last(&self) -> Option<u8> {
        self.last
    }

    /// Open a door. Returns `None` if the hideout is closed or the door is
    /// out of range or already open.
    pub fn pick(&mut self, position: usize, total: &mut u64) -> Option<HideoutPick> {
        if !self.active || *self.revealed.get(position)? {
            return None;
        }
        self.revealed[position] = true;
        let value = self.values[position];

        let success = self.last.map_or(true, |last| value > last);
        if !success {
            self.active = false;
            *total = total.saturating_add(self.accumulated);
            return Some(HideoutPick {
                position,
                value,
                success: false,
                failed: true,
                jackpot: false,
                accumulated: self.accumulated,
                payout: Some(self.accumulated),
            });
        }

        self.successes += 1;
        self.last = Some(value);
        self.accumulated = self.accumulated.saturating_add(step_reward(self.successes));

        let mut pick = HideoutPick {
            position,
            value,
            success: true,
            failed: false,
            jackpot: false,
            accumulated: self.accumulated,
            payout: None,
        };
        if value as usize == POSITIONS {
            self.active = false;
            let jackpot = self.successes >= JACKPOT_STREAK;
            let payout = if jackpot { JACKPOT } else { self.accumulated };
            *total = total.saturating_add(payout);
            pick.jackpot = jackpot;
            pick.payout = Some(payout);
        }
        Some(pick)
    }
}
