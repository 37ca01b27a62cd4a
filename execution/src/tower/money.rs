//! Money arithmetic shared by the floor engine and the minigames.
//!
//! Totals are unsigned; every decrease saturates at zero and every
//! multiplicative step floors its result.

use towercash_types::{Amount, SpecialAction};

/// Add a signed amount.
pub fn add_signed(total: u64, delta: i64) -> u64 {
    if delta >= 0 {
        total.saturating_add(delta as u64)
    } else {
        total.saturating_sub(delta.unsigned_abs())
    }
}

/// `total + floor(total * percent / 100)`, clamped at zero.
pub fn apply_percent(total: u64, percent: i64) -> u64 {
    let change = (total as i128 * percent as i128).div_euclid(100);
    (total as i128 + change).clamp(0, u64::MAX as i128) as u64
}

/// Multiply by a factor given in hundredths, flooring the result.
pub fn apply_hundredths(total: u64, hundredths: u64) -> u64 {
    let product = total as u128 * hundredths as u128 / 100;
    product.min(u64::MAX as u128) as u64
}

/// `total * 10`.
pub fn add_zero(total: u64) -> u64 {
    total.saturating_mul(10)
}

/// Prepend a `1` to the decimal representation of the total.
pub fn add_one(total: u64) -> u64 {
    format!("1{total}").parse().unwrap_or(u64::MAX)
}

/// Apply a floor amount to the total.
///
/// `random_percent` is the roll for a "Random ± %" tile; it is ignored for
/// every other amount.
pub fn apply_amount(total: u64, amount: &Amount, random_percent: Option<i64>) -> u64 {
    match amount {
        Amount::Cash { value } => add_signed(total, *value),
        Amount::Percentage { value } => apply_percent(total, *value as i64),
        Amount::Random { generated, .. } => total.saturating_add(generated.unwrap_or(0)),
        Amount::Special {
            action, generated, ..
        } => match action {
            SpecialAction::AddZero => add_zero(total),
            SpecialAction::AddOne => add_one(total),
            SpecialAction::BoostMultiplier => {
                apply_hundredths(total, generated.unwrap_or(100) as u64)
            }
            SpecialAction::RandomPercentage => apply_percent(total, random_percent.unwrap_or(0)),
            SpecialAction::XLevel => total,
        },
        Amount::Event { .. } | Amount::Nothing | Amount::GameOver => total,
    }
}
