//! ∞%.
//!
//! Coin-flip picks: every right call adds 5% to the pot, every wrong call is a
//! strike. Three strikes apply the pot minus 100% to the total.

use super::{money, GameRng};
use serde::Serialize;
use towercash_types::Side;

/// Percent added per correct pick.
pub const STEP_PERCENT: i64 = 5;

pub const MAX_STRIKES: u8 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct InfinityOutcome {
    /// `None` for a cash-out.
    pub correct: Option<bool>,
    pub accumulated_percent: i64,
    pub strikes: u8,
    /// Percentage applied to the total when the game closed.
    pub applied_percent: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Infinity {
    accumulated_percent: i64,
    strikes: u8,
    picks: u32,
    active: bool,
}

impl Infinity {
    pub fn start() -> Self {
        Self {
            accumulated_percent: 0,
            strikes: 0,
            picks: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn accumulated_percent(&self) -> i64 {
        self.accumulated_percent
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    fn outcome(&self, correct: Option<bool>, applied_percent: Option<i64>) -> InfinityOutcome {
        InfinityOutcome {
            correct,
            accumulated_percent: self.accumulated_percent,
            strikes: self.strikes,
            applied_percent,
        }
    }

    /// Pick a side; the winning side is drawn fresh each time.
    pub fn pick(&mut self, side: Side, total: &mut u64, rng: &mut GameRng) -> Option<InfinityOutcome> {
        let winner = rng.side();
        self.resolve(side == winner, total)
    }

    fn resolve(&mut self, correct: bool, total: &mut u64) -> Option<InfinityOutcome> {
        if !self.active {
            return None;
        }
        self.picks += 1;
        if correct {
            self.accumulated_percent += STEP_PERCENT;
            return Some(self.outcome(Some(true), None));
        }
        self.strikes += 1;
        if self.strikes < MAX_STRIKES {
            return Some(self.outcome(Some(false), None));
        }
        let penalty = self.accumulated_percent - 100;
        *total = money::apply_percent(*total, penalty);
        self.active = false;
        Some(self.outcome(Some(false), Some(penalty)))
    }

    /// Stop and apply the pot as a bonus percentage.
    pub fn cash_out(&mut self, total: &mut u64) -> Option<InfinityOutcome> {
        if !self.active {
            return None;
        }
        self.active = false;
        *total = money::apply_percent(*total, self.accumulated_percent);
        Some(self.outcome(None, Some(self.accumulated_percent)))
    }
}
