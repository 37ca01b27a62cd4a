//! Boiling Point.
//!
//! Ten values 0..=90 are shuffled. The first eight form the main sequence:
//! its head is the starting temperature and the other seven are added or
//! subtracted one at a time at the player's choice. The last two are
//! reserves that can each replace the upcoming value once. The final
//! temperature decides the prize.

use super::GameRng;
use super::Sign;
use serde::Serialize;

/// Values in the main sequence, starting temperature included.
pub const SEQUENCE: usize = 8;

/// Signed steps the player takes after the starting temperature.
pub const STEPS: usize = SEQUENCE - 1;

pub const RESERVES: usize = 2;

/// Prize for landing exactly on 100.
pub const BOILING_PRIZE: u64 = 2_000_000;

/// Prize for landing exactly on 0.
pub const FROZEN_PRIZE: u64 = 200_000;

const PER_TEN_DEGREES: u64 = 25_000;

pub fn prize(temperature: i64) -> u64 {
    match temperature {
        100 => BOILING_PRIZE,
        0 => FROZEN_PRIZE,
        10..=90 => (temperature / 10) as u64 * PER_TEN_DEGREES,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoilingEvent {
    Step { sign: Sign, value: i64 },
    Changed { old: i64, new: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoilingOutcome {
    pub event: BoilingEvent,
    pub temperature: i64,
    pub steps_left: usize,
    pub reserves_left: usize,
    /// Prize added to the total after the last step.
    pub payout: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BoilingPoint {
    temperature: i64,
    #[serde(skip)]
    sequence: [i64; STEPS],
    #[serde(skip)]
    reserves: [i64; RESERVES],
    step: usize,
    reserves_used: usize,
    active: bool,
}

impl BoilingPoint {
    pub fn start(rng: &mut GameRng) -> Self {
        let mut values: [i64; SEQUENCE + RESERVES] = std::array::from_fn(|i| i as i64 * 10);
        rng.shuffle(&mut values);
        let mut sequence = [0; STEPS];
        sequence.copy_from_slice(&values[1..SEQUENCE]);
        let mut reserves = [0; RESERVES];
        reserves.copy_from_slice(&values[SEQUENCE..]);
        Self::with_values(values[0], sequence, reserves)
    }

    fn with_values(temperature: i64, sequence: [i64; STEPS], reserves: [i64; RESERVES]) -> Self {
        Self {
            temperature,
            sequence,
            reserves,
            step: 0,
            reserves_used: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn temperature(&self) -> i64 {
        self.temperature
    }

    /// Value the next step will add or subtract.
    pub fn upcoming(&self) -> Option<i64> {
        if !self.active {
            return None;
        }
        self.sequence.get(self.step).copied()
    }

    pub fn reserves_left(&self) -> usize {
        RESERVES - self.reserves_used
    }

    fn outcome(&self, event: BoilingEvent, payout: Option<u64>) -> BoilingOutcome {
        BoilingOutcome {
            event,
            temperature: self.temperature,
            steps_left: STEPS - self.step,
            reserves_left: self.reserves_left(),
            payout,
        }
    }

    pub fn step(&mut self, sign: Sign, total: &mut u64) -> Option<BoilingOutcome> {
        let value = self.upcoming()?;
        self.temperature += match sign {
            Sign::Plus => value,
            Sign::Minus => -value,
        };
        self.step += 1;
        let event = BoilingEvent::Step { sign, value };
        if self.step < STEPS {
            return Some(self.outcome(event, None));
        }
        self.active = false;
        let payout = prize(self.temperature);
        *total = total.saturating_add(payout);
        Some(self.outcome(event, Some(payout)))
    }

    /// Swap the upcoming value for the next unused reserve.
    pub fn change(&mut self) -> Option<BoilingOutcome> {
        let old = self.upcoming()?;
        let new = *self.reserves.get(self.reserves_used)?;
        self.reserves_used += 1;
        self.sequence[self.step] = new;
        Some(self.outcome(BoilingEvent::Changed { old, new }, None))
    }
}
