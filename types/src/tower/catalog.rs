//! Base floor catalogs.
//!
//! A catalog is the exact multiset of amounts dealt onto the floors of one
//! game, so its length is always twice the floor count of its mode.

use super::{Amount, EventAction, SpecialAction};

const NORMAL_CASH: [i64; 12] = [
    1_000, 5_000, 10_000, 25_000, 50_000, 75_000, 100_000, 150_000, 250_000, 500_000, 750_000,
    1_000_000,
];

const NORMAL_PERCENTAGES: [i32; 8] = [10, 25, 50, 100, -10, -25, -50, -100];

const NORMAL_NOTHING: usize = 14;

const EVENT_CASH: [i64; 8] = [
    3_000, 15_000, 20_000, 40_000, 200_000, 300_000, 400_000, 2_000_000,
];

const EVENT_PERCENTAGES: [i32; 3] = [75, -75, 200];

/// The 42 amounts of a normal 21-floor game.
pub fn normal_catalog() -> Vec<Amount> {
    let mut catalog = Vec::with_capacity(42);
    catalog.extend(NORMAL_CASH.iter().map(|v| Amount::cash(*v)));
    catalog.extend(NORMAL_PERCENTAGES.iter().map(|v| Amount::percentage(*v)));
    catalog.push(Amount::random(1_000, 100_000, "Lucky Draw"));
    catalog.push(Amount::random(50_000, 500_000, "Jackpot Roll"));
    catalog.push(Amount::special(SpecialAction::AddZero));
    catalog.push(Amount::special(SpecialAction::AddOne));
    catalog.push(Amount::special(SpecialAction::BoostMultiplier));
    catalog.push(Amount::special(SpecialAction::XLevel));
    catalog.extend(std::iter::repeat(Amount::GameOver).take(2));
    catalog.extend(std::iter::repeat(Amount::Nothing).take(NORMAL_NOTHING));
    catalog
}

/// The 56 amounts of an event-mode 28-floor game, before event tiles are
/// substituted into its "nothing" slots.
pub fn event_catalog() -> Vec<Amount> {
    let mut catalog = normal_catalog();
    // "Nothing" entries stay last.
    let nothing = catalog.split_off(catalog.len() - NORMAL_NOTHING);
    catalog.extend(EVENT_CASH.iter().map(|v| Amount::cash(*v)));
    catalog.extend(EVENT_PERCENTAGES.iter().map(|v| Amount::percentage(*v)));
    catalog.push(Amount::random(100_000, 1_000_000, "Mega Roll"));
    catalog.push(Amount::special(SpecialAction::AddZero));
    catalog.push(Amount::GameOver);
    catalog.extend(nothing);
    catalog
}

/// Tiles swapped into "nothing" slots when event mode is on: every minigame
/// except Mystery Box once, two Mystery Boxes and one "Random ± %".
pub fn event_substitutions() -> Vec<Amount> {
    let mut tiles: Vec<Amount> = EventAction::ALL
        .iter()
        .filter(|a| **a != EventAction::MysteryBox)
        .map(|a| Amount::event(*a))
        .collect();
    tiles.push(Amount::event(EventAction::MysteryBox));
    tiles.push(Amount::event(EventAction::MysteryBox));
    tiles.push(Amount::special(SpecialAction::RandomPercentage));
    tiles
}
