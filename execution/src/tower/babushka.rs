//! Babushka.
//!
//! Twelve nesting dolls each hide a final value. Opening a doll reveals its
//! layers one prize tier at a time, up to that value; peeling past the last
//! layer finds an empty doll, a strike that wipes the stash. Banking a layer
//! moves its tier into the stash and discards the doll. Three strikes cost the
//! player their whole total.

use super::GameRng;
use serde::Serialize;

pub const DOLLS: usize = 12;

pub const MAX_STRIKES: u8 = 3;

/// Final values hidden in the dolls; the zeros are empty dolls.
pub const DOLL_VALUES: [u64; DOLLS] = [
    0, 0, 10_000, 20_000, 50_000, 100_000, 250_000, 500_000, 1_000_000, 2_500_000, 5_000_000,
    10_000_000,
];

/// Prize tiers revealed one layer at a time.
pub const TIERS: [u64; 10] = [
    10_000, 20_000, 50_000, 100_000, 250_000, 500_000, 1_000_000, 2_500_000, 5_000_000,
    10_000_000,
];

/// Layers in a doll worth `value`.
pub fn ladder_len(value: u64) -> usize {
    TIERS.iter().take_while(|t| **t <= value).count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BabushkaEvent {
    /// A layer showed this tier.
    Layer { tier: u64 },
    /// The top tier was reached and banked automatically.
    AutoBanked { tier: u64 },
    /// An empty layer: stash lost, doll discarded.
    Strike,
    Banked { tier: u64 },
    WalkedAway,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BabushkaOutcome {
    pub doll: Option<usize>,
    pub event: BabushkaEvent,
    pub stash: u64,
    pub strikes: u8,
    /// Amount added to the total when the game closed.
    pub payout: Option<u64>,
    /// The third strike cleared the total.
    pub busted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
struct OpenDoll {
    index: usize,
    layers: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct Babushka {
    #[serde(skip)]
    values: [u64; DOLLS],
    opened: [bool; DOLLS],
    current: Option<OpenDoll>,
    stash: u64,
    strikes: u8,
    active: bool,
}

impl Babushka {
    pub fn start(rng: &mut GameRng) -> Self {
        let mut values = DOLL_VALUES;
        rng.shuffle(&mut values);
        Self::with_values(values)
    }

    fn with_values(values: [u64; DOLLS]) -> Self {
        Self {
            values,
            opened: [false; DOLLS],
            current: None,
            stash: 0,
            strikes: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn stash(&self) -> u64 {
        self.stash
    }

    pub fn strikes(&self) -> u8 {
        self.strikes
    }

    pub fn current_doll(&self) -> Option<usize> {
        self.current.map(|d| d.index)
    }

    /// Tier showing on the open doll.
    pub fn current_tier(&self) -> Option<u64> {
        let doll = self.current?;
        doll.layers.checked_sub(1).map(|i| TIERS[i])
    }

    fn outcome(&self, doll: Option<usize>, event: BabushkaEvent) -> BabushkaOutcome {
        BabushkaOutcome {
            doll,
            event,
            stash: self.stash,
            strikes: self.strikes,
            payout: None,
            busted: false,
        }
    }

    /// Open an unopened doll and reveal its first layer. Rejected while
    /// another doll is open.
    pub fn open_doll(&mut self, index: usize, total: &mut u64) -> Option<BabushkaOutcome> {
        if !self.active || self.current.is_some() || *self.opened.get(index)? {
            return None;
        }
        self.opened[index] = true;
        self.current = Some(OpenDoll { index, layers: 0 });
        self.reveal(total)
    }

    /// Reveal the next layer of the open doll.
    pub fn reveal(&mut self, total: &mut u64) -> Option<BabushkaOutcome> {
        if !self.active {
            return None;
        }
        let mut doll = self.current?;
        doll.layers += 1;

        if doll.layers > ladder_len(self.values[doll.index]) {
            self.current = None;
            self.stash = 0;
            self.strikes += 1;
            let mut outcome = self.outcome(Some(doll.index), BabushkaEvent::Strike);
            if self.strikes >= MAX_STRIKES {
                self.active = false;
                *total = 0;
                outcome.payout = Some(0);
                outcome.busted = true;
                return Some(outcome);
            }
            return Some(self.finish_if_exhausted(outcome, total));
        }

        let tier = TIERS[doll.layers - 1];
        if doll.layers == TIERS.len() {
            self.current = None;
            self.stash = self.stash.saturating_add(tier);
            let outcome = self.outcome(Some(doll.index), BabushkaEvent::AutoBanked { tier });
            return Some(self.finish_if_exhausted(outcome, total));
        }
        self.current = Some(doll);
        Some(self.outcome(Some(doll.index), BabushkaEvent::Layer { tier }))
    }

    /// Bank the tier showing on the open doll and discard it.
    pub fn bank(&mut self, total: &mut u64) -> Option<BabushkaOutcome> {
        if !self.active {
            return None;
        }
        let tier = self.current_tier()?;
        let index = self.current_doll()?;
        self.current = None;
        self.stash = self.stash.saturating_add(tier);
        let outcome = self.outcome(Some(index), BabushkaEvent::Banked { tier });
        Some(self.finish_if_exhausted(outcome, total))
    }

    /// Leave with the stash. An unbanked layer on the open doll is forfeited.
    pub fn walk_away(&mut self, total: &mut u64) -> Option<BabushkaOutcome> {
        if !self.active {
            return None;
        }
        let doll = self.current_doll();
        let outcome = self.outcome(doll, BabushkaEvent::WalkedAway);
        Some(self.settle(outcome, total))
    }

    fn settle(&mut self, mut outcome: BabushkaOutcome, total: &mut u64) -> BabushkaOutcome {
        self.active = false;
        self.current = None;
        *total = total.saturating_add(self.stash);
        outcome.payout = Some(self.stash);
        outcome
    }

    /// Every doll opened and none in hand: pay the stash.
    fn finish_if_exhausted(&mut self, outcome: BabushkaOutcome, total: &mut u64) -> BabushkaOutcome {
        if self.current.is_none() && self.opened.iter().all(|o| *o) {
            return self.settle(outcome, total);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Babushka {
        Babushka::with_values(DOLL_VALUES)
    }

    #[test]
    fn test_ladder_lengths() {
        assert_eq!(ladder_len(0), 0);
        assert_eq!(ladder_len(10_000), 1);
        assert_eq!(ladder_len(250_000), 5);
        assert_eq!(ladder_len(10_000_000), 10);
    }

    #[test]
    fn test_reveal_then_bank() {
        let mut game = game();
        let mut total = 1_000;
        // doll 5 holds 100,000: four layers
        let first = game.open_doll(5, &mut total).unwrap();
        assert_eq!(first.event, BabushkaEvent::Layer { tier: 10_000 });
        let second = game.reveal(&mut total).unwrap();
        assert_eq!(second.event, BabushkaEvent::Layer { tier: 20_000 });
        let banked = game.bank(&mut total).unwrap();
        assert_eq!(banked.event, BabushkaEvent::Banked { tier: 20_000 });
        assert_eq!(game.stash(), 20_000);
        assert!(game.current_doll().is_none());
        assert_eq!(total, 1_000);

        let left = game.walk_away(&mut total).unwrap();
        assert_eq!(left.payout, Some(20_000));
        assert_eq!(total, 21_000);
        assert!(!game.is_active());
    }

    #[test]
    fn test_empty_layer_strikes_and_wipes_stash() {
        let mut game = game();
        let mut total = 1_000;
        game.open_doll(2, &mut total).unwrap();
        game.bank(&mut total).unwrap();
        assert_eq!(game.stash(), 10_000);

        // doll 3 holds 20,000: a third layer is empty
        game.open_doll(3, &mut total).unwrap();
        game.reveal(&mut total).unwrap();
        let strike = game.reveal(&mut total).unwrap();
        assert_eq!(strike.event, BabushkaEvent::Strike);
        assert_eq!(strike.stash, 0);
        assert_eq!(strike.strikes, 1);
        assert!(game.current_doll().is_none());
        assert!(game.is_active());
    }

    #[test]
    fn test_empty_doll_strikes_on_open() {
        let mut game = game();
        let mut total = 1_000;
        let outcome = game.open_doll(0, &mut total).unwrap();
        assert_eq!(outcome.event, BabushkaEvent::Strike);
        assert!(game.bank(&mut total).is_none());
    }

    #[test]
    fn test_three_strikes_clear_total() {
        let mut game = game();
        let mut total = 500_000;
        game.open_doll(0, &mut total).unwrap();
        game.open_doll(1, &mut total).unwrap();
        game.open_doll(2, &mut total).unwrap();
        // Doll 2 holds a single layer, so the first reveal finds it empty.
        let outcome = game.reveal(&mut total).unwrap();
        assert!(outcome.busted);
        assert_eq!(total, 0);
        assert!(!game.is_active());
        assert!(game.open_doll(4, &mut total).is_none());
    }

    #[test]
    fn test_top_tier_auto_banks() {
        let mut game = game();
        let mut total = 0;
        game.open_doll(11, &mut total).unwrap();
        let mut last = None;
        for _ in 1..TIERS.len() {
            last = game.reveal(&mut total);
        }
        let last = last.unwrap();
        assert_eq!(last.event, BabushkaEvent::AutoBanked { tier: 10_000_000 });
        assert_eq!(game.stash(), 10_000_000);
        assert!(game.is_active());
    }

    #[test]
    fn test_one_doll_at_a_time() {
        let mut game = game();
        let mut total = 0;
        game.open_doll(6, &mut total).unwrap();
        assert!(game.open_doll(7, &mut total).is_none());
        assert!(game.open_doll(DOLLS, &mut total).is_none());
        game.bank(&mut total).unwrap();
        assert!(game.open_doll(6, &mut total).is_none());
        assert!(game.open_doll(7, &mut total).is_some());
    }

    #[test]
    fn test_walk_away_forfeits_unbanked_layer() {
        let mut game = game();
        let mut total = 0;
        game.open_doll(9, &mut total).unwrap();
        let outcome = game.walk_away(&mut total).unwrap();
        assert_eq!(outcome.payout, Some(0));
        assert_eq!(total, 0);
    }

    #[test]
    fn test_last_doll_settles() {
        let mut game = game();
        game.opened = [true; DOLLS];
        game.opened[4] = false;
        let mut total = 0;
        game.open_doll(4, &mut total).unwrap();
        let outcome = game.bank(&mut total).unwrap();
        assert_eq!(outcome.payout, Some(10_000));
        assert_eq!(total, 10_000);
        assert!(!game.is_active());
    }
}
