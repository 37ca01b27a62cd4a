//! Remaining-amounts ledger.
//!
//! Counts how many of each amount are still hidden in the tower. Every floor
//! taken out of play (picked, or skipped by X Level) removes both of its
//! amounts exactly once.

use super::pool::FloorPool;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use towercash_types::{Amount, AmountKey, FloorPair};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    pub count: u32,
    /// At least one amount with this key has been taken out of play.
    pub revealed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Ledger {
    entries: BTreeMap<AmountKey, LedgerEntry>,
    resolved: BTreeSet<usize>,
}

impl Ledger {
    pub fn new(pool: &FloorPool) -> Self {
        let mut entries: BTreeMap<AmountKey, LedgerEntry> = BTreeMap::new();
        for amount in pool.amounts() {
            entries.entry(amount.key()).or_default().count += 1;
        }
        Self {
            entries,
            resolved: BTreeSet::new(),
        }
    }

    fn mark(&mut self, amount: &Amount) {
        let entry = self.entries.entry(amount.key()).or_default();
        debug_assert!(entry.count > 0, "ledger underflow for {}", amount.key());
        entry.count = entry.count.saturating_sub(1);
        entry.revealed = true;
    }

    /// Take a floor's pair out of play. Returns false if the floor was
    /// already resolved.
    pub fn resolve_floor(&mut self, floor: usize, pair: &FloorPair) -> bool {
        if !self.resolved.insert(floor) {
            return false;
        }
        self.mark(&pair.left);
        self.mark(&pair.right);
        true
    }

    pub fn get(&self, key: &AmountKey) -> Option<&LedgerEntry> {
        self.entries.get(key)
    }

    pub fn count(&self, key: &AmountKey) -> u32 {
        self.entries.get(key).map(|e| e.count).unwrap_or(0)
    }

    /// Amounts still hidden somewhere in the tower.
    pub fn remaining(&self) -> u32 {
        self.entries.values().map(|e| e.count).sum()
    }

    pub fn floors_resolved(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_resolved(&self, floor: usize) -> bool {
        self.resolved.contains(&floor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AmountKey, &LedgerEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::{pool, GameRng};
    use towercash_types::GameConfig;

    #[test]
    fn test_ledger_starts_full() {
        let config = GameConfig::normal();
        let pool = pool::generate(&config, false, &mut GameRng::new(1, 1, 0));
        let ledger = Ledger::new(&pool);
        assert_eq!(ledger.remaining(), 42);
        assert_eq!(ledger.count(&AmountKey::Nothing), 14);
        assert!(ledger.iter().all(|(_, e)| !e.revealed));
    }

    #[test]
    fn test_resolve_floor_once() {
        let config = GameConfig::normal();
        let pool = pool::generate(&config, false, &mut GameRng::new(2, 1, 0));
        let mut ledger = Ledger::new(&pool);
        let pair = pool.floor(5).unwrap().clone();

        assert!(ledger.resolve_floor(5, &pair));
        assert!(!ledger.resolve_floor(5, &pair));
        assert_eq!(ledger.remaining(), 40);
        assert_eq!(ledger.floors_resolved(), 1);
        assert!(ledger.is_resolved(5));
        assert!(ledger.get(&pair.left.key()).unwrap().revealed);
        assert!(ledger.get(&pair.right.key()).unwrap().revealed);
    }

    #[test]
    fn test_conservation_across_all_floors() {
        let config = GameConfig::event();
        let pool = pool::generate(&config, true, &mut GameRng::new(3, 1, 0));
        let mut ledger = Ledger::new(&pool);
        for (floor, pair) in pool.iter() {
            ledger.resolve_floor(floor, pair);
            assert_eq!(
                ledger.remaining() as usize + 2 * ledger.floors_resolved(),
                2 * pool.len()
            );
        }
        assert_eq!(ledger.remaining(), 0);
    }
}
