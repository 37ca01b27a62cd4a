//! Floor pool generation.
//!
//! The pool is dealt once per session: the mode's catalog (with event tiles
//! substituted in event mode) is shuffled, split into left/right pairs and
//! every rolled value is fixed up front.

use super::GameRng;
use serde::Serialize;
use towercash_types::{Amount, FloorPair, GameConfig, SpecialAction, BOOST_MULTIPLIER_LIMIT};
use tracing::warn;

/// Amounts behind every floor, indexed by floor number (1-based).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FloorPool {
    floors: Vec<FloorPair>,
}

impl FloorPool {
    #[cfg(test)]
    pub(crate) fn from_pairs(floors: Vec<FloorPair>) -> Self {
        Self { floors }
    }

    pub fn floor(&self, floor: usize) -> Option<&FloorPair> {
        floor.checked_sub(1).and_then(|i| self.floors.get(i))
    }

    pub fn len(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Floor numbers with their pairs, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FloorPair)> {
        self.floors.iter().enumerate().map(|(i, pair)| (i + 1, pair))
    }

    /// Every amount in the pool, left before right, floor by floor.
    pub fn amounts(&self) -> impl Iterator<Item = &Amount> {
        self.floors.iter().flat_map(|pair| [&pair.left, &pair.right])
    }
}

/// Replace the first "nothing" entries of `catalog`, in catalog order, with
/// `substitutions`. Substitutions that do not fit are dropped.
pub fn substitute(catalog: &mut [Amount], substitutions: &[Amount]) -> usize {
    let slots: Vec<usize> = catalog
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_nothing())
        .map(|(i, _)| i)
        .collect();
    if slots.len() < substitutions.len() {
        warn!(
            available = slots.len(),
            wanted = substitutions.len(),
            "not enough nothing slots for event tiles"
        );
    }
    let mut applied = 0;
    for (slot, tile) in slots.into_iter().zip(substitutions) {
        catalog[slot] = tile.clone();
        applied += 1;
    }
    applied
}

/// Fix the rolled value of a random or boost-multiplier amount.
fn roll(amount: &mut Amount, rng: &mut GameRng) {
    match amount {
        Amount::Random {
            min,
            max,
            generated,
            ..
        } => {
            *generated = Some(rng.range_inclusive(*min, *max));
        }
        Amount::Special {
            action: SpecialAction::BoostMultiplier,
            generated,
            ..
        } => {
            *generated = Some(rng.next_bounded(BOOST_MULTIPLIER_LIMIT as u64) as u32);
        }
        _ => {}
    }
}

/// Deal the floor pool for one game.
pub fn generate(config: &GameConfig, event_mode: bool, rng: &mut GameRng) -> FloorPool {
    let floors = config.floor_count();
    let mut amounts = config.catalog.clone();
    if event_mode {
        substitute(&mut amounts, &config.substitutions);
    }
    if amounts.len() != 2 * floors {
        warn!(
            catalog = amounts.len(),
            slots = 2 * floors,
            "catalog does not match floor count"
        );
        amounts.resize(2 * floors, Amount::Nothing);
    }

    rng.shuffle(&mut amounts);
    for amount in amounts.iter_mut() {
        roll(amount, rng);
    }

    let mut iter = amounts.into_iter();
    let mut pairs = Vec::with_capacity(floors);
    while let (Some(left), Some(right)) = (iter.next(), iter.next()) {
        pairs.push(FloorPair { left, right });
    }
    FloorPool { floors: pairs }
}
