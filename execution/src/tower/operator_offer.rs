//! Operator Offer.
//!
//! The Operator names a price for the player's run. Accepting ends the game
//! with that total; declining changes nothing.

use super::GameRng;
use serde::Serialize;

/// Offer range used when the player has nothing yet.
pub const BROKE_OFFER_RANGE: (u64, u64) = (100_000, 5_000_000);

/// Draw an offer: half to one and a half times the total.
pub fn draw_offer(total: u64, rng: &mut GameRng) -> u64 {
    if total == 0 {
        let (min, max) = BROKE_OFFER_RANGE;
        return rng.range_inclusive(min, max);
    }
    let min = total / 2;
    let max = total.saturating_add(total / 2);
    rng.range_inclusive(min, max)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OfferOutcome {
    pub offer: u64,
    pub accepted: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct OperatorOffer {
    offer: u64,
    active: bool,
}

impl OperatorOffer {
    pub fn start(total: u64, rng: &mut GameRng) -> Self {
        Self {
            offer: draw_offer(total, rng),
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn offer(&self) -> u64 {
        self.offer
    }

    /// Take the deal: the total becomes the offer.
    pub fn accept(&mut self, total: &mut u64) -> Option<OfferOutcome> {
        if !self.active {
            return None;
        }
        self.active = false;
        *total = self.offer;
        Some(OfferOutcome {
            offer: self.offer,
            accepted: true,
        })
    }

    pub fn decline(&mut self) -> Option<OfferOutcome> {
        if !self.active {
            return None;
        }
        self.active = false;
        Some(OfferOutcome {
            offer: self.offer,
            accepted: false,
        })
    }
}
